/// Database configuration and connection management
pub mod database;

/// Built-in default channels and categories
pub mod seed;

/// Application settings loading from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, load_app_configuration};
