//! Timestamp formatting shared by every table.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render a UTC instant the way it is stored in `created_at` columns.
///
/// Fixed microsecond precision keeps lexicographic order equal to
/// chronological order, which the `ORDER BY created_at` queries rely on.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time in storage format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
