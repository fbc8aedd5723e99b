//! ContactSource trait definition.
//!
//! This module defines the [`ContactSource`] trait, the core abstraction
//! for contact backends (local files, CardDAV servers).
//!
//! Sources are responsible for:
//! - Fetching raw contact data payloads
//! - Handling authentication against remote servers
//! - Failing with a typed [`SourceError`](crate::error::SourceError)

use std::future::Future;
use std::pin::Pin;

use crate::error::SourceResult;

/// A boxed future for async trait methods.
///
/// Async functions in traits do not mix with dynamic dispatch, so the
/// trait uses boxed futures to stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for contact backends.
///
/// A source produces a raw contact-data payload: a single string holding
/// zero or more concatenated vCard records. It performs no parsing.
///
/// # Implementation Notes
///
/// - Implementations should be `Send + Sync` for use in async contexts
/// - `fetch` must not block indefinitely; remote sources carry a bounded
///   request timeout
/// - Failures are typed; nothing is retried at this layer
pub trait ContactSource: Send + Sync {
    /// Returns the name/type of this source (e.g., "file", "carddav").
    fn name(&self) -> &str;

    /// Returns a stable descriptor identifying this source's target.
    ///
    /// Two sources with the same descriptor fetch the same data; the feed
    /// cache key is derived from it.
    fn descriptor(&self) -> String;

    /// Fetches the raw contact payload.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on network errors, authentication failures,
    /// unreadable files, or malformed query responses.
    fn fetch(&self) -> BoxFuture<'_, SourceResult<String>>;
}
