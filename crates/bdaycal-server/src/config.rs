//! Feed pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use bdaycal_core::ReminderConfig;

/// Configuration for the feed pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Language tag for all user-visible strings (e.g. "en", "de").
    pub language: String,

    /// Reminder attached to every generated event.
    pub reminder: ReminderConfig,

    /// How long a built document stays cached. Zero disables caching.
    pub cache_ttl: Duration,
}

impl FeedConfig {
    /// Default cache TTL in seconds.
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

    /// Builder: set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder: set the reminder configuration.
    pub fn with_reminder(mut self, reminder: ReminderConfig) -> Self {
        self.reminder = reminder;
        self
    }

    /// Builder: set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            reminder: ReminderConfig::default(),
            cache_ttl: Duration::from_secs(Self::DEFAULT_CACHE_TTL_SECS),
        }
    }
}
