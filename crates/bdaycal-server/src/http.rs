//! HTTP caching headers for the feed endpoint.
//!
//! The orchestrator emits the feed as a downloadable calendar document;
//! this module builds the header set that goes with it: content type and
//! attachment disposition, cache control derived from the configured TTL,
//! and the Last-Modified / ETag validators for conditional requests.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Content type of the generated document.
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Attachment disposition offered to browsers.
pub const CONTENT_DISPOSITION: &str = "attachment; filename=\"birthdays.ics\"";

/// Formats a timestamp as an IMF-fixdate (RFC 7231) header value.
pub fn format_http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses an IMF-fixdate header value such as `If-Modified-Since`.
///
/// Returns `None` for malformed values; a client sending garbage simply
/// gets the full document.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Builds a strong entity tag from the document build instant.
pub fn entity_tag(generated_at: DateTime<Utc>) -> String {
    format!("\"{}\"", generated_at.timestamp())
}

/// Builds the response headers for a full feed document.
pub fn feed_headers(generated_at: DateTime<Utc>, cache_ttl: Duration) -> Vec<(String, String)> {
    let cache_control = if cache_ttl.is_zero() {
        "no-store, no-cache".to_string()
    } else {
        format!("max-age={}", cache_ttl.as_secs())
    };

    vec![
        ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
        (
            "Content-Disposition".to_string(),
            CONTENT_DISPOSITION.to_string(),
        ),
        ("Cache-Control".to_string(), cache_control),
        ("Last-Modified".to_string(), format_http_date(generated_at)),
        ("ETag".to_string(), entity_tag(generated_at)),
    ]
}
