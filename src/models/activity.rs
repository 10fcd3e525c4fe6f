// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity records and the derived series built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Minimal projection of a post or snippet used for activity statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Document ID of the post or snippet
    pub id: String,
    /// Creation time as stored (RFC3339). Kept raw so bad values can be skipped.
    #[serde(default)]
    pub created_at: String,
}

impl ActivityRecord {
    pub fn new(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
        }
    }
}

/// Number of records per calendar day.
///
/// Serialized as `{"YYYY-MM-DD": count}` with keys in date order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFrequencyMap(BTreeMap<NaiveDate, u32>);

impl DateFrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more record on `day`.
    pub fn increment(&mut self, day: NaiveDate) {
        *self.0.entry(day).or_insert(0) += 1;
    }

    /// Count for `day`, 0 if nothing happened that day.
    pub fn get(&self, day: NaiveDate) -> u32 {
        self.0.get(&day).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.0.iter().map(|(&day, &count)| (day, count))
    }
}

impl FromIterator<(NaiveDate, u32)> for DateFrequencyMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Record count for one week of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyBucket {
    /// Week of the year, 0..=53 depending on the numbering convention
    pub week_number: u32,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_increment_and_total() {
        let mut map = DateFrequencyMap::new();
        map.increment(day(2024, 1, 1));
        map.increment(day(2024, 1, 1));
        map.increment(day(2024, 1, 2));

        assert_eq!(map.get(day(2024, 1, 1)), 2);
        assert_eq!(map.get(day(2024, 1, 3)), 0);
        assert_eq!(map.total(), 3);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_serializes_as_date_keyed_object() {
        let map: DateFrequencyMap = [(day(2024, 1, 2), 1), (day(2024, 1, 1), 2)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2024-01-01":2,"2024-01-02":1}"#);

        let back: DateFrequencyMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_record_without_timestamp_deserializes() {
        let record: ActivityRecord = serde_json::from_str(r#"{"id": "s1"}"#).unwrap();
        assert_eq!(record.created_at, "");
    }
}
