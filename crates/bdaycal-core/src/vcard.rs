//! vCard contact parsing.
//!
//! This module extracts [`BirthdayRecord`]s from raw vCard payloads. The
//! parsing is best-effort by design: real-world address-book exports are
//! messy, so malformed or incomplete records are skipped silently rather
//! than rejected. The parser never fails.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, trace};

use crate::contact::{BirthdayRecord, PLACEHOLDER_YEAR};
use crate::i18n::Translate;

/// Year-less birthday: two placeholder dashes, 2-digit month, optional
/// separator, 2-digit day (`--1225` or `--12-25`).
static YEARLESS_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--(\d{2})-?(\d{2})$").expect("static pattern"));

/// Full numeric date: 4-digit year, 2-digit month and day, separators
/// optional (`19900515` or `1990-05-15`).
static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?(\d{2})-?(\d{2})$").expect("static pattern"));

/// Parses a raw vCard payload into birthday records.
///
/// The payload may contain zero or more concatenated vCard records with
/// any mix of CR, CRLF, and LF line endings. A record is emitted only when
/// it carries a parseable `BDAY` value; its name falls back to the
/// localized unknown placeholder when no `FN` property is present.
pub fn parse_contacts(raw: &str, i18n: &dyn Translate) -> Vec<BirthdayRecord> {
    let unknown = i18n.translate("contact.unknown", &[]);

    let mut records = Vec::new();
    let mut in_record = false;
    let mut name = unknown.clone();
    let mut birthday: Option<(NaiveDate, bool)> = None;

    for line in normalize_newlines(raw).lines() {
        let upper = line.to_ascii_uppercase();

        if upper.starts_with("BEGIN:VCARD") {
            in_record = true;
            name = unknown.clone();
            birthday = None;
        } else if upper.starts_with("END:VCARD") {
            if in_record {
                if let Some((date, has_known_year)) = birthday.take() {
                    records.push(BirthdayRecord::new(name.clone(), date, has_known_year));
                } else {
                    trace!(name = %name, "Skipping record without parseable birthday");
                }
                in_record = false;
            }
        } else if in_record {
            if let Some(value) = property_value(line, "FN") {
                let trimmed = value.trim();
                name = if trimmed.is_empty() {
                    unknown.clone()
                } else {
                    trimmed.to_string()
                };
            } else if let Some(value) = property_value(line, "BDAY")
                && let Some(parsed) = parse_birthday(value)
            {
                // Last occurrence wins when a record carries several BDAY lines.
                birthday = Some(parsed);
            }
        }
    }

    debug!(count = records.len(), "Parsed birthday records");
    records
}

/// Parses a vCard `BDAY` value into a date and a known-year flag.
///
/// Anything after a `T` time separator is ignored. A year-less value
/// (`--MM-DD`) is anchored to [`PLACEHOLDER_YEAR`] so February 29 stays
/// valid. Unsupported syntax and impossible dates yield `None`.
pub fn parse_birthday(raw: &str) -> Option<(NaiveDate, bool)> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();

    if let Some(caps) = YEARLESS_DATE.captures(date_part) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(PLACEHOLDER_YEAR, month, day)?;
        return Some((date, false));
    }

    if let Some(caps) = FULL_DATE.captures(date_part) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        return Some((date, true));
    }

    None
}

/// Extracts the value of a vCard property line, tolerating parameters.
///
/// Matches `FN:value` as well as `FN;CHARSET=UTF-8:value`; the property
/// name comparison is case-insensitive.
fn property_value<'a>(line: &'a str, property: &str) -> Option<&'a str> {
    let (head, value) = line.split_once(':')?;
    let prop = head.split(';').next().unwrap_or(head);
    prop.trim().eq_ignore_ascii_case(property).then_some(value)
}

/// Collapses CR, CRLF, and LF line endings to LF.
fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}
