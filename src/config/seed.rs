//! Default channels and categories given to a user whose lists are empty.
//!
//! These are used when `config.toml` has no `[seed]` section; a config file can replace
//! either list, or set it to `[]` to disable seeding.

use crate::core::{category::CategoryInput, channel::ChannelInput};

const DEFAULT_CHANNELS: [(&str, &str); 2] = [("Cash", "💰"), ("Main card", "💳")];

const DEFAULT_CATEGORIES: [(&str, &str); 7] = [
    ("🥦", "Food"),
    ("🚌", "Transport"),
    ("🏠", "Housing"),
    ("🎢", "Leisure"),
    ("🩺", "Health"),
    ("🛒", "Shopping"),
    ("📱", "Subscriptions"),
];

/// Channels created on a user's first channel listing.
#[must_use]
pub fn default_channels() -> Vec<ChannelInput> {
    DEFAULT_CHANNELS
        .iter()
        .map(|(name, icon)| ChannelInput {
            name: (*name).to_string(),
            icon: (*icon).to_string(),
            color: None,
        })
        .collect()
}

/// Categories created on a user's first category listing.
#[must_use]
pub fn default_categories() -> Vec<CategoryInput> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(emoji, name)| CategoryInput {
            emoji: (*emoji).to_string(),
            name: (*name).to_string(),
        })
        .collect()
}
