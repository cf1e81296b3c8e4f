//! # ISO Week Keys
//!
//! Stock history is grouped by calendar week using ISO-8601 week keys of the
//! form `YYYY-Www` (e.g. "2026-W32"). Zero-padded week numbers make the keys
//! sort correctly as plain strings, which the weekly history query relies on.

use chrono::{DateTime, Datelike, Utc};

/// Returns the ISO week key for a timestamp, e.g. "2026-W32".
///
/// Uses the ISO week-numbering year, which can differ from the calendar
/// year around January 1st (Dec 30 2024 falls in 2025-W01).
pub fn week_key(ts: DateTime<Utc>) -> String {
    let iso = ts.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
