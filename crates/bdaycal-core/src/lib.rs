//! Core types: birthday records, vCard parsing, calendar generation, i18n

pub mod contact;
pub mod i18n;
pub mod ics;
pub mod tracing;
pub mod vcard;

pub use contact::{BirthdayRecord, PLACEHOLDER_YEAR, contact_identity};
pub use i18n::{Catalog, Language, Translate};
pub use ics::{ReminderConfig, ReminderDirection, ReminderUnit, escape_text, generate_feed};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use vcard::{parse_birthday, parse_contacts};
