//! iCalendar feed generation.
//!
//! Turns a set of [`BirthdayRecord`]s into a complete iCalendar document:
//! a three-year rolling window of all-day VEVENT blocks per contact, with
//! age-aware localized summaries and optional VALARM reminders. The output
//! grammar (CRLF terminators, `KEY:VALUE` lines, backslash escaping) is
//! assembled by hand because third-party calendar clients require it
//! byte-for-byte.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contact::BirthdayRecord;
use crate::i18n::Translate;

/// Product identifier stamped into every generated document.
const PRODID: &str = "-//bdaycal//bdaycal 0.1.0//EN";

/// Domain suffix for event UIDs.
const UID_DOMAIN: &str = "bdaycal.local";

/// Suggested client refresh interval.
const REFRESH_INTERVAL: &str = "PT12H";

/// Unit of a reminder offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderUnit {
    /// Whole days.
    Days,
    /// Whole hours.
    Hours,
    /// Whole minutes.
    Minutes,
}

/// Whether the reminder fires before or after the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderDirection {
    /// Fire before the event (negative trigger offset).
    Before,
    /// Fire after the event.
    After,
}

/// Reminder configuration applied to every generated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Whether a VALARM block is attached to each event.
    pub enabled: bool,
    /// Offset magnitude (positive).
    pub value: u32,
    /// Offset unit.
    pub unit: ReminderUnit,
    /// Offset direction relative to the event.
    pub direction: ReminderDirection,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            value: 1,
            unit: ReminderUnit::Days,
            direction: ReminderDirection::Before,
        }
    }
}

impl ReminderConfig {
    /// Returns the ISO 8601 trigger offset for this reminder.
    ///
    /// Days map to `P<n>D`, hours to `PT<n>H`, minutes to `PT<n>M`; a
    /// leading `-` marks a before-the-event trigger.
    pub fn trigger(&self) -> String {
        let duration = match self.unit {
            ReminderUnit::Days => format!("P{}D", self.value),
            ReminderUnit::Hours => format!("PT{}H", self.value),
            ReminderUnit::Minutes => format!("PT{}M", self.value),
        };
        match self.direction {
            ReminderDirection::Before => format!("-{duration}"),
            ReminderDirection::After => duration,
        }
    }
}

/// Escapes a string for use in an iCalendar TEXT value.
///
/// Backslash, semicolon, and comma get a backslash prefix; a newline
/// becomes the two-character sequence `\n` (RFC 5545 §3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Generates the complete iCalendar document for the given records.
///
/// For each record, one all-day event is materialized per year of the
/// rolling window around `now` (previous, current, next), skipping years
/// before a known birth year. Deterministic for fixed inputs and `now`;
/// `now` is also the `DTSTAMP` shared by every event in the document.
pub fn generate_feed(
    records: &[BirthdayRecord],
    reminder: &ReminderConfig,
    i18n: &dyn Translate,
    now: DateTime<Utc>,
) -> String {
    let current_year = now.year();
    let dtstamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let calendar_name = escape_text(&i18n.translate("calendar.name", &[]));

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".into(),
        format!("X-WR-CALNAME:{calendar_name}"),
        format!("REFRESH-INTERVAL;VALUE=DURATION:{REFRESH_INTERVAL}"),
        format!("X-PUBLISHED-TTL:{REFRESH_INTERVAL}"),
    ];

    let mut events = 0usize;
    for record in records {
        for year in (current_year - 1)..=(current_year + 1) {
            // Nobody has a birthday before they were born.
            if record.has_known_year && year < record.birth_date.year() {
                continue;
            }

            let summary = event_summary(record, year, i18n);
            let date = occurrence_date(record.birth_date, year);

            lines.push("BEGIN:VEVENT".into());
            lines.push(format!("UID:{}-{}@{}", record.id, year, UID_DOMAIN));
            lines.push(format!("DTSTAMP:{dtstamp}"));
            lines.push(format!("DTSTART;VALUE=DATE:{}", date.format("%Y%m%d")));
            lines.push(format!("SUMMARY:{summary}"));
            lines.push("TRANSP:TRANSPARENT".into());
            if reminder.enabled {
                lines.push("BEGIN:VALARM".into());
                lines.push("ACTION:DISPLAY".into());
                lines.push(format!("DESCRIPTION:{summary}"));
                lines.push(format!("TRIGGER:{}", reminder.trigger()));
                lines.push("END:VALARM".into());
            }
            lines.push("END:VEVENT".into());
            events += 1;
        }
    }

    lines.push("END:VCALENDAR".into());
    debug!(
        events,
        contacts = records.len(),
        "Generated calendar document"
    );

    let mut document = lines.join("\r\n");
    document.push_str("\r\n");
    document
}

/// Builds the localized event summary for one occurrence year.
///
/// The display name is escaped before substitution so the translation
/// output can go into a TEXT value as-is.
fn event_summary(record: &BirthdayRecord, year: i32, i18n: &dyn Translate) -> String {
    let name = escape_text(&record.display_name);
    match record.birth_year() {
        None => i18n.translate("summary.generic", &[&name]),
        Some(birth_year) => match year - birth_year {
            0 => i18n.translate("summary.born", &[&name]),
            1 => i18n.translate("summary.turns_one", &[&name]),
            age => i18n.translate("summary.turns", &[&name, &age.to_string()]),
        },
    }
}

/// Maps a birthday onto a target year.
///
/// February 29 rolls forward to March 1 in non-leap target years (chrono
/// rejects the invalid date rather than normalizing, so the step is
/// explicit here).
fn occurrence_date(birth_date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .expect("March 1 exists in every year")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::PLACEHOLDER_YEAR;
    use crate::i18n::Catalog;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generate(records: &[BirthdayRecord], reminder: &ReminderConfig) -> String {
        generate_feed(records, reminder, &Catalog::default(), now())
    }

    fn event_count(document: &str) -> usize {
        document.matches("BEGIN:VEVENT").count()
    }

    mod reminder {
        use super::*;

        fn config(value: u32, unit: ReminderUnit, direction: ReminderDirection) -> ReminderConfig {
            ReminderConfig {
                enabled: true,
                value,
                unit,
                direction,
            }
        }

        #[test]
        fn trigger_strings() {
            let before = ReminderDirection::Before;
            let after = ReminderDirection::After;

            assert_eq!(config(1, ReminderUnit::Days, before).trigger(), "-P1D");
            assert_eq!(config(2, ReminderUnit::Days, after).trigger(), "P2D");
            assert_eq!(config(12, ReminderUnit::Hours, before).trigger(), "-PT12H");
            assert_eq!(config(30, ReminderUnit::Minutes, before).trigger(), "-PT30M");
            assert_eq!(config(45, ReminderUnit::Minutes, after).trigger(), "PT45M");
        }

        #[test]
        fn default_is_disabled() {
            let reminder = ReminderConfig::default();
            assert!(!reminder.enabled);
            assert_eq!(reminder.trigger(), "-P1D");
        }

        #[test]
        fn serde_roundtrip() {
            let reminder = config(30, ReminderUnit::Minutes, ReminderDirection::After);
            let json = serde_json::to_string(&reminder).unwrap();
            assert!(json.contains("\"minutes\""));
            let parsed: ReminderConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(reminder, parsed);
        }
    }

    mod escaping {
        use super::*;

        #[test]
        fn special_characters() {
            assert_eq!(escape_text("Doe, John; Jr."), "Doe\\, John\\; Jr.");
            assert_eq!(escape_text("back\\slash"), "back\\\\slash");
            assert_eq!(escape_text("line\nbreak"), "line\\nbreak");
            assert_eq!(escape_text("plain"), "plain");
        }

        #[test]
        fn escaped_name_appears_in_document() {
            let records = [BirthdayRecord::new("Doe, John; Jr.", date(1990, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());
            assert!(document.contains("Doe\\, John\\; Jr."));
            assert!(!document.contains("Doe, John"));
        }
    }

    mod rolling_window {
        use super::*;

        #[test]
        fn three_events_with_increasing_ages() {
            // Born exactly 10 years before the current year.
            let records = [BirthdayRecord::new("John", date(2015, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(event_count(&document), 3);
            assert!(document.contains("SUMMARY:John turns 9 years old"));
            assert!(document.contains("SUMMARY:John turns 10 years old"));
            assert!(document.contains("SUMMARY:John turns 11 years old"));
        }

        #[test]
        fn newborn_suppresses_previous_year() {
            let records = [BirthdayRecord::new("Baby", date(2025, 3, 1), true)];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(event_count(&document), 2);
            assert!(document.contains("SUMMARY:Baby was born"));
            assert!(document.contains("SUMMARY:Baby turns 1 year old"));
            assert!(!document.contains("DTSTART;VALUE=DATE:20240301"));
        }

        #[test]
        fn born_next_year_yields_single_event() {
            let records = [BirthdayRecord::new("Soon", date(2026, 1, 1), true)];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(event_count(&document), 1);
            assert!(document.contains("SUMMARY:Soon was born"));
        }

        #[test]
        fn first_birthday_uses_singular_phrasing() {
            let records = [BirthdayRecord::new("Tom", date(2024, 6, 1), true)];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(event_count(&document), 3);
            assert!(document.contains("SUMMARY:Tom was born"));
            assert!(document.contains("SUMMARY:Tom turns 1 year old"));
            assert!(document.contains("SUMMARY:Tom turns 2 years old"));
        }

        #[test]
        fn unknown_year_uses_generic_phrasing() {
            let records = [BirthdayRecord::new(
                "Jane",
                date(PLACEHOLDER_YEAR, 12, 25),
                false,
            )];
            let document = generate(&records, &ReminderConfig::default());

            // No birth year means no suppression and no age.
            assert_eq!(event_count(&document), 3);
            assert_eq!(document.matches("SUMMARY:Birthday of Jane").count(), 3);
            assert!(document.contains("DTSTART;VALUE=DATE:20241225"));
            assert!(document.contains("DTSTART;VALUE=DATE:20251225"));
            assert!(document.contains("DTSTART;VALUE=DATE:20261225"));
        }

        #[test]
        fn leap_day_rolls_forward_to_march_first() {
            let records = [BirthdayRecord::new("Leap", date(2000, 2, 29), true)];
            let document = generate(&records, &ReminderConfig::default());

            // 2024 is a leap year; 2025 and 2026 roll forward to March 1.
            assert!(document.contains("DTSTART;VALUE=DATE:20240229"));
            assert!(document.contains("DTSTART;VALUE=DATE:20250301"));
            assert!(document.contains("DTSTART;VALUE=DATE:20260301"));
            assert!(!document.contains("DTSTART;VALUE=DATE:20250228"));
        }
    }

    mod document {
        use super::*;

        #[test]
        fn envelope_framing() {
            let document = generate(&[], &ReminderConfig::default());

            assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
            assert!(document.ends_with("\r\nEND:VCALENDAR\r\n"));
            assert!(document.contains("VERSION:2.0\r\n"));
            assert!(document.contains("PRODID:-//bdaycal//bdaycal 0.1.0//EN\r\n"));
            assert!(document.contains("CALSCALE:GREGORIAN\r\n"));
            assert!(document.contains("X-WR-CALNAME:Birthdays\r\n"));
            assert!(document.contains("REFRESH-INTERVAL;VALUE=DURATION:PT12H\r\n"));
            assert!(document.contains("X-PUBLISHED-TTL:PT12H\r\n"));
        }

        #[test]
        fn every_line_is_crlf_terminated() {
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());

            for line in document.split_inclusive("\r\n") {
                assert!(line.ends_with("\r\n"), "line not CRLF terminated: {line:?}");
                let body = &line[..line.len() - 2];
                assert!(!body.contains('\n'), "stray LF inside line: {line:?}");
            }
        }

        #[test]
        fn uid_is_distinct_per_contact_and_year() {
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());

            for year in [2024, 2025, 2026] {
                let uid = format!("UID:{}-{}@bdaycal.local", records[0].id, year);
                assert_eq!(document.matches(&uid).count(), 1);
            }
        }

        #[test]
        fn dtstamp_is_shared_document_build_time() {
            let records = [
                BirthdayRecord::new("John", date(1990, 5, 15), true),
                BirthdayRecord::new("Jane", date(1985, 3, 2), true),
            ];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(
                document.matches("DTSTAMP:20250615T120000Z").count(),
                event_count(&document)
            );
        }

        #[test]
        fn events_are_transparent_all_day_blocks() {
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());

            assert_eq!(document.matches("TRANSP:TRANSPARENT").count(), 3);
            assert!(document.contains("DTSTART;VALUE=DATE:20250515"));
            // Floating date: no time component, no UTC marker on DTSTART.
            assert!(!document.contains("DTSTART;VALUE=DATE:20250515T"));
        }

        #[test]
        fn reminder_block_attached_when_enabled() {
            let reminder = ReminderConfig {
                enabled: true,
                value: 1,
                unit: ReminderUnit::Days,
                direction: ReminderDirection::Before,
            };
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let document = generate(&records, &reminder);

            assert_eq!(document.matches("BEGIN:VALARM").count(), 3);
            assert_eq!(document.matches("END:VALARM").count(), 3);
            assert_eq!(document.matches("TRIGGER:-P1D").count(), 3);
            assert_eq!(document.matches("ACTION:DISPLAY").count(), 3);
        }

        #[test]
        fn no_reminder_block_when_disabled() {
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let document = generate(&records, &ReminderConfig::default());
            assert!(!document.contains("VALARM"));
        }

        #[test]
        fn deterministic_for_fixed_inputs() {
            let records = [BirthdayRecord::new("John", date(1990, 5, 15), true)];
            let a = generate(&records, &ReminderConfig::default());
            let b = generate(&records, &ReminderConfig::default());
            assert_eq!(a, b);
        }
    }
}
