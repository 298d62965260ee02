//! Application settings loading from config.toml
//!
//! Every section and field is optional; anything left out falls back to its default, and
//! a missing file means "all defaults". The listen address can be overridden with
//! `FINTRACK_BIND` without touching the file.

use crate::{
    config::seed,
    core::{budget::BudgetScope, category::CategoryInput, channel::ChannelInput},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FINTRACK_CONFIG";
/// Environment variable overriding `server.bind`.
pub const BIND_ENV: &str = "FINTRACK_BIND";
/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Session lifetime and refresh cadence
    pub session: SessionConfig,
    /// Budget progress settings
    pub budgets: BudgetConfig,
    /// Defaults inserted for users with empty lists
    pub seed: SeedConfig,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes a token stays valid after sign-in or refresh
    pub ttl_minutes: u32,
    /// Minutes between automatic refreshes in a session manager
    pub refresh_interval_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 60,
            refresh_interval_minutes: 10,
        }
    }
}

impl SessionConfig {
    /// Token lifetime.
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.ttl_minutes))
    }

    /// Period between automatic refreshes of a client
    /// [`SessionManager`](crate::core::session::SessionManager).
    ///
    /// The server never refreshes on its own; this only configures library clients.
    #[must_use]
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.refresh_interval_minutes) * 60)
    }
}

/// `[budgets]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Which expenses count toward a budget
    pub scope: BudgetScope,
}

/// `[seed]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Channels for a user with none
    pub channels: Vec<ChannelInput>,
    /// Categories for a user with none
    pub categories: Vec<CategoryInput>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            channels: seed::default_channels(),
            categories: seed::default_categories(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML for
/// [`AppConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading configuration");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads `path` if it exists, otherwise uses defaults, then applies `bind_override`.
pub fn resolve_config(path: &Path, bind_override: Option<String>) -> Result<AppConfig> {
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        info!(path = %path.display(), "No config file found, using defaults");
        AppConfig::default()
    };

    if let Some(bind) = bind_override.filter(|b| !b.trim().is_empty()) {
        debug!(%bind, "Bind address overridden from environment");
        config.server.bind = bind;
    }
    Ok(config)
}

/// Loads the configuration named by `FINTRACK_CONFIG` (default `config.toml`) and applies
/// the `FINTRACK_BIND` override.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = resolve_config(Path::new(&path), std::env::var(BIND_ENV).ok())?;
    info!(
        bind = %config.server.bind,
        scope = ?config.budgets.scope,
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fintrack-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r##"
            [server]
            bind = "0.0.0.0:8080"

            [session]
            ttl_minutes = 30
            refresh_interval_minutes = 5

            [budgets]
            scope = "all_time"

            [[seed.channels]]
            name = "Wallet"
            icon = "👛"
            color = "#aa0000"

            [[seed.categories]]
            emoji = "🐶"
            name = "Pets"
        "##;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.session.ttl(), chrono::Duration::minutes(30));
        assert_eq!(
            config.session.refresh_interval(),
            std::time::Duration::from_secs(300)
        );
        assert_eq!(config.budgets.scope, BudgetScope::AllTime);
        assert_eq!(config.seed.channels.len(), 1);
        assert_eq!(config.seed.channels[0].color.as_deref(), Some("#aa0000"));
        assert_eq!(config.seed.categories[0].name, "Pets");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str("[session]\nttl_minutes = 15\n").unwrap();
        assert_eq!(config.session.ttl_minutes, 15);
        assert_eq!(config.session.refresh_interval_minutes, 10);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.budgets.scope, BudgetScope::Period);
        assert_eq!(config.seed, SeedConfig::default());
    }

    #[test]
    fn test_empty_seed_lists_disable_seeding() {
        let config: AppConfig = toml::from_str("[seed]\nchannels = []\ncategories = []\n").unwrap();
        assert!(config.seed.channels.is_empty());
        assert!(config.seed.categories.is_empty());
    }

    #[test]
    fn test_missing_file_uses_defaults_and_override() {
        let path = std::env::temp_dir().join("fintrack-does-not-exist.toml");
        let config = resolve_config(&path, Some("0.0.0.0:9000".to_string())).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.session, SessionConfig::default());

        let blank_override = resolve_config(&path, Some("  ".to_string())).unwrap();
        assert_eq!(blank_override.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_file_is_read_and_malformed_file_is_an_error() {
        let good = temp_config("good", "[server]\nbind = \"127.0.0.1:4000\"\n");
        assert_eq!(resolve_config(&good, None).unwrap().server.bind, "127.0.0.1:4000");

        let bad = temp_config("bad", "[budgets]\nscope = \"forever\"\n");
        assert!(matches!(resolve_config(&bad, None), Err(Error::Config { .. })));

        std::fs::remove_file(good).unwrap();
        std::fs::remove_file(bad).unwrap();
    }
}
