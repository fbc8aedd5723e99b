//! Feed pipeline error types.

use thiserror::Error;

use bdaycal_core::Translate;
use bdaycal_providers::SourceError;

/// Result type for feed pipeline operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur while producing a feed.
///
/// Unparseable contact records are not an error: the parser drops them
/// silently by design, so the only failure mode of the pipeline is the
/// source fetch.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The contact source could not be fetched.
    #[error("contact source failed: {0}")]
    Source(#[from] SourceError),
}

impl FeedError {
    /// Returns the single localized, user-facing message for this failure.
    pub fn localized_message(&self, i18n: &dyn Translate) -> String {
        match self {
            Self::Source(e) => i18n.translate("error.source", &[&e.to_string()]),
        }
    }
}
