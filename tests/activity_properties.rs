// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Property tests for activity bucketing and rollups.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use updately::models::{ActivityRecord, DateFrequencyMap};
use updately::services::activity::window_labels;
use updately::services::rollup::window_start;
use updately::services::{bucket_by_day, rollup_by_week, window_ending, WeekNumbering};

/// Seconds since the epoch between 2000-01-01 and 2040-01-01.
fn epoch_secs() -> impl Strategy<Value = i64> {
    946_684_800i64..2_208_988_800i64
}

fn to_record(i: usize, secs: i64) -> ActivityRecord {
    let ts = Utc.timestamp_opt(secs, 0).unwrap();
    ActivityRecord::new(format!("r{}", i), ts.to_rfc3339())
}

fn records_strategy() -> impl Strategy<Value = Vec<ActivityRecord>> {
    prop::collection::vec(
        prop_oneof![
            9 => epoch_secs().prop_map(Some),
            1 => Just(None),
        ],
        0..200,
    )
    .prop_map(|stamps| {
        stamps
            .into_iter()
            .enumerate()
            .map(|(i, secs)| match secs {
                Some(secs) => to_record(i, secs),
                None => ActivityRecord::new(format!("bad{}", i), "not a date"),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn bucket_total_equals_parseable_records(records in records_strategy()) {
        let valid = records
            .iter()
            .filter(|r| DateTime::parse_from_rfc3339(&r.created_at).is_ok())
            .count();
        let map = bucket_by_day(&records, &Utc);
        prop_assert_eq!(map.total(), valid as u64);
    }

    #[test]
    fn bucketing_ignores_input_order(mut records in records_strategy()) {
        let forward = bucket_by_day(&records, &Utc);
        records.reverse();
        let backward = bucket_by_day(&records, &Utc);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn window_has_requested_length(
        records in records_strategy(),
        days in 0u32..400,
        offset in 0i64..20_000,
    ) {
        let map = bucket_by_day(&records, &Utc);
        let today = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset);

        let series = window_ending(&map, days, today);
        prop_assert_eq!(series.len(), days as usize);
        prop_assert_eq!(window_labels(days, today).len(), days as usize);
    }

    #[test]
    fn window_last_entry_is_today(records in records_strategy(), days in 1u32..60) {
        let map = bucket_by_day(&records, &Utc);
        if let Some((day, count)) = map.iter().last() {
            let series = window_ending(&map, days, day);
            prop_assert_eq!(series[days as usize - 1], count);
        }
    }

    #[test]
    fn empty_map_gives_zero_window(days in 0u32..400) {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let series = window_ending(&DateFrequencyMap::new(), days, today);
        prop_assert!(series.iter().all(|&c| c == 0));
    }

    #[test]
    fn sunday_week_in_range(offset in 0i64..20_000) {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset);
        prop_assert!(WeekNumbering::Sunday.week_of(date) <= 53);
        let iso = WeekNumbering::Iso.week_of(date);
        prop_assert!((1..=53).contains(&iso));
    }

    #[test]
    fn rollup_counts_only_window(records in records_strategy(), now_secs in epoch_secs()) {
        let now = Utc.timestamp_opt(now_secs, 0).unwrap();
        let start = window_start(now);
        let expected = records
            .iter()
            .filter_map(|r| DateTime::parse_from_rfc3339(&r.created_at).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .filter(|ts| *ts >= start && *ts <= now)
            .count();

        let buckets = rollup_by_week(&records, now, WeekNumbering::Sunday);
        let total: u32 = buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(total as usize, expected);
        // Six calendar weeks, one of which may be split at New Year
        prop_assert!(buckets.len() <= 7);
        prop_assert!(buckets.iter().all(|b| b.count > 0));
    }
}
