//! Feed pipeline: orchestration, caching, HTTP semantics.
//!
//! This crate wires the contact-to-calendar pipeline together:
//! - Cache key derivation and an in-memory TTL cache for built documents
//! - The fetch → parse → generate → store pipeline
//! - HTTP caching headers and conditional (not-modified) responses
//!
//! # Example
//!
//! ```ignore
//! use bdaycal_providers::FileSource;
//! use bdaycal_core::Catalog;
//! use bdaycal_server::{FeedConfig, FeedService};
//!
//! let service = FeedService::new(
//!     Box::new(FileSource::new("/data/contacts.vcf")),
//!     Box::new(Catalog::for_tag("en")),
//!     FeedConfig::default(),
//! );
//! let response = service.produce_feed(None).await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;

pub use cache::{CacheEntry, FeedCache};
pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use feed::{FeedResponse, FeedService};
