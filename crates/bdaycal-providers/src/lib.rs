//! ContactSource trait and implementations.
//!
//! This crate provides the fetch boundary of the birthday feed pipeline:
//!
//! - [`ContactSource`] - The trait every contact backend implements
//! - [`FileSource`] - A local vCard export on disk
//! - [`CardDavSource`] - A remote endpoint, fetched with a plain GET or a
//!   CardDAV `addressbook-query` REPORT
//! - [`SourceError`] - Error types for fetch operations
//!
//! A source returns the raw contact payload as a single string that may
//! contain zero or more concatenated vCard records; parsing happens
//! downstream in `bdaycal-core`.

pub mod carddav;
pub mod error;
pub mod file;
pub mod source;

// Re-export main types at crate root
pub use carddav::{CardDavConfig, CardDavSource};
pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use file::FileSource;
pub use source::{BoxFuture, ContactSource};
