//! Remote contact source implementation.
//!
//! This module provides a [`CardDavSource`] that fetches contact data from
//! a remote endpoint, either with a plain HTTP GET (a published vCard
//! file) or with a CardDAV `addressbook-query` REPORT against an address
//! book collection.
//!
//! # Features
//!
//! - HTTP Basic authentication (retried once on a 401 challenge)
//! - REPORT with multistatus parsing and address-data extraction
//! - Bounded request timeout
//! - TLS configuration (can be disabled for testing)
//!
//! # Example
//!
//! ```ignore
//! use bdaycal_providers::carddav::{CardDavSource, CardDavConfig};
//!
//! let config = CardDavConfig::new("https://dav.example.com/addressbooks/user/contacts/")?
//!     .with_credentials("user", "password")
//!     .with_addressbook_query(true);
//!
//! let source = CardDavSource::new(config)?;
//! let payload = source.fetch().await?;
//! ```

mod client;
mod config;
mod source;
mod xml;

pub use config::CardDavConfig;
pub use source::CardDavSource;
