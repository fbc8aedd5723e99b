//! Birthday record type and deterministic contact identity.
//!
//! This module defines [`BirthdayRecord`], the typed representation of a
//! contact's birthday as extracted from an address book, and the stable
//! identity derivation that lets calendar clients update rather than
//! duplicate entries across feed refreshes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Placeholder year for birthdays whose year is unknown.
///
/// Must be a leap year so that February 29 birthdays stay representable.
pub const PLACEHOLDER_YEAR: i32 = 2000;

/// Namespace prefix mixed into the identity digest.
const IDENTITY_NAMESPACE: &str = "bdaycal:contact:";

/// A contact's birthday as extracted from an address book.
///
/// Records are created fresh on every parse and consumed by the calendar
/// generator; they are never mutated or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    /// Stable identity derived from the display name.
    ///
    /// The same name yields the same identity across runs.
    pub id: String,
    /// The contact's display name (never empty; a localized placeholder is
    /// substituted upstream when the source record has no name).
    pub display_name: String,
    /// The birth date. When the year is unknown, the year component is
    /// [`PLACEHOLDER_YEAR`].
    pub birth_date: NaiveDate,
    /// Whether the year component of `birth_date` is the real birth year.
    pub has_known_year: bool,
}

impl BirthdayRecord {
    /// Creates a new record, deriving the identity from the display name.
    pub fn new(
        display_name: impl Into<String>,
        birth_date: NaiveDate,
        has_known_year: bool,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            id: contact_identity(&display_name),
            display_name,
            birth_date,
            has_known_year,
        }
    }

    /// Returns the birth year, if it is known.
    pub fn birth_year(&self) -> Option<i32> {
        self.has_known_year.then(|| self.birth_date.year())
    }
}

/// Derives the stable identity for a contact display name.
///
/// A hex SHA-256 digest over a fixed namespace prefix and the name. Used
/// only for uniqueness and cross-run stability, not for security.
pub fn contact_identity(display_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(IDENTITY_NAMESPACE.as_bytes());
    hasher.update(display_name.as_bytes());
    hex::encode(hasher.finalize())
}
