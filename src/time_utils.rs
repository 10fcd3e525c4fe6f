// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
///
/// Stored `created_at` values must be UTC with a `Z` suffix so that string
/// comparison in Firestore filters matches chronological order. Fractional
/// seconds are allowed in stored data; range filters go through
/// [`query_lower_bound`].
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// String lower bound for a `created_at >=` filter.
///
/// Truncated to the second with no suffix, so it sorts at or before every
/// `Z`-suffixed timestamp in that second, with or without a fraction
/// (`.` and `Z` both sort after the end of the bound). Records from earlier in
/// the same second also pass; callers re-check parsed timestamps.
pub fn query_lower_bound(since: DateTime<Utc>) -> String {
    since.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a stored RFC3339 timestamp, returning `None` if it is malformed.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Short `M/d` label used on graph axes (e.g. "6/10").
pub fn graph_label(date: NaiveDate) -> String {
    date.format("%-m/%-d").to_string()
}
