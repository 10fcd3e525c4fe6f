// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily activity bucketing for calendar heatmaps and trend lines.
//!
//! Two steps:
//! 1. `bucket_by_day` turns raw records into a per-day frequency map
//! 2. `window_ending` projects that map onto a trailing N-day series

use crate::models::{ActivityRecord, DateFrequencyMap};
use crate::time_utils::{graph_label, parse_timestamp};
use chrono::{Days, Local, NaiveDate, TimeZone};

/// Count records per calendar day in the given time zone.
///
/// Day boundaries follow `tz`; request handlers pass `chrono::Local` so that
/// buckets line up with the server-local "today" used by [`window`].
/// Records whose timestamp does not parse are skipped with a warning.
pub fn bucket_by_day<'a, Tz, I>(records: I, tz: &Tz) -> DateFrequencyMap
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let mut map = DateFrequencyMap::new();

    for record in records {
        match parse_timestamp(&record.created_at) {
            Some(timestamp) => map.increment(timestamp.with_timezone(tz).date_naive()),
            None => {
                tracing::warn!(
                    record_id = %record.id,
                    created_at = %record.created_at,
                    "Skipping activity record with unparseable timestamp"
                );
            }
        }
    }

    map
}

/// Trailing `days`-long series ending at `today` (inclusive).
///
/// Entry `i` is the count for `today - (days - 1 - i)`; days missing from
/// the map are 0. The result always has exactly `days` entries.
pub fn window_ending(map: &DateFrequencyMap, days: u32, today: NaiveDate) -> Vec<u32> {
    (0..days)
        .map(|i| {
            today
                .checked_sub_days(Days::new(u64::from(days - 1 - i)))
                .map(|day| map.get(day))
                .unwrap_or(0)
        })
        .collect()
}

/// Same as [`window_ending`], with today read from the local clock.
///
/// Callers building several series for one response should take
/// [`local_today`] once and use `window_ending` so all series share a window.
pub fn window(map: &DateFrequencyMap, days: u32) -> Vec<u32> {
    window_ending(map, days, local_today())
}

/// Axis labels (`M/d`) matching [`window_ending`] entry for entry.
pub fn window_labels(days: u32, today: NaiveDate) -> Vec<String> {
    (0..days)
        .map(|i| {
            today
                .checked_sub_days(Days::new(u64::from(days - 1 - i)))
                .map(graph_label)
                .unwrap_or_default()
        })
        .collect()
}

/// Current calendar day in the server's local zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
