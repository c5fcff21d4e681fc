//! Date formatting helpers shared by the envelope and the services

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 in UTC with millisecond precision and a `Z` suffix,
/// e.g. `2024-03-01T09:30:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    iso_timestamp(Utc::now())
}

/// Calendar date only, `YYYY-MM-DD`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}
