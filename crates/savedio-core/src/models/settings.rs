//! Application settings model

use serde::{Deserialize, Serialize};

/// Bookmark ordering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first, favorites on top
    #[default]
    Date,
    /// Alphabetical, favorites on top
    Title,
    /// Most clicked first
    Clicks,
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// saved.io user key; `None` means the app works offline
    pub user_api_key: Option<String>,
    /// Promote frequently opened bookmarks to favorites automatically
    pub smart_favorites: bool,
    /// Preferred bookmark ordering
    pub sort_order: SortOrder,
}

impl Settings {
    /// Whether a user key is configured
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.user_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.sort_order, SortOrder::Date);
        assert!(!settings.smart_favorites);
        assert!(!settings.is_online());
    }

    #[test]
    fn test_blank_key_is_offline() {
        let settings = Settings {
            user_api_key: Some("  ".to_string()),
            ..Settings::default()
        };
        assert!(!settings.is_online());
    }
}
