// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly rollup of posts/snippets per user or project.
//!
//! Firestore cannot group server-side, so the storage layer applies the
//! time-window filter and the grouping below runs on the returned rows.

use crate::models::{ActivityRecord, WeeklyBucket};
use crate::time_utils::parse_timestamp;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Length of the trailing rollup window: five weeks.
pub const ROLLUP_WINDOW_DAYS: i64 = 5 * 7;

/// Week-of-year convention for grouping.
///
/// Week numbers are computed on the UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekNumbering {
    /// Weeks start on Sunday; days before the year's first Sunday are week 0
    /// (range 0..=53). Same as the document database `$week` operator and
    /// `strftime("%U")`.
    #[default]
    Sunday,
    /// ISO 8601 weeks: Monday start, week 1 contains the year's first
    /// Thursday (range 1..=53). Early January days may belong to week 52/53.
    Iso,
}

impl WeekNumbering {
    pub fn week_of(self, date: NaiveDate) -> u32 {
        match self {
            WeekNumbering::Sunday => {
                (date.ordinal0() + 7 - date.weekday().num_days_from_sunday()) / 7
            }
            WeekNumbering::Iso => date.iso_week().week(),
        }
    }
}

impl FromStr for WeekNumbering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" => Ok(WeekNumbering::Sunday),
            "iso" => Ok(WeekNumbering::Iso),
            other => Err(format!("unknown week numbering: {other}")),
        }
    }
}

impl fmt::Display for WeekNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekNumbering::Sunday => write!(f, "sunday"),
            WeekNumbering::Iso => write!(f, "iso"),
        }
    }
}

/// Collection whose records are rolled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedCollection {
    Posts,
    Snippets,
}

impl RelatedCollection {
    pub fn collection_name(self) -> &'static str {
        match self {
            RelatedCollection::Posts => crate::db::collections::POSTS,
            RelatedCollection::Snippets => crate::db::collections::SNIPPETS,
        }
    }
}

/// Entity that owns a set of activity records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    User(String),
    Project(String),
}

impl ParentRef {
    pub fn id(&self) -> &str {
        match self {
            ParentRef::User(id) | ParentRef::Project(id) => id,
        }
    }

    /// Foreign-key field on the related document.
    ///
    /// Posts reference projects through an array field, so project parents
    /// use `project_ids` there.
    pub fn field(&self, collection: RelatedCollection) -> &'static str {
        match (self, collection) {
            (ParentRef::User(_), _) => "user_id",
            (ParentRef::Project(_), RelatedCollection::Snippets) => "project_id",
            (ParentRef::Project(_), RelatedCollection::Posts) => "project_ids",
        }
    }

    /// Whether the foreign-key field holds an array of IDs.
    pub fn field_is_array(&self, collection: RelatedCollection) -> bool {
        matches!(
            (self, collection),
            (ParentRef::Project(_), RelatedCollection::Posts)
        )
    }
}

/// Oldest instant included in a rollup taken at `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(ROLLUP_WINDOW_DAYS)
}

/// Count records per week inside `[now - 35 days, now]`.
///
/// One bucket per week that has records, ordered by each week's earliest
/// record. Records with unparseable timestamps are skipped.
pub fn rollup_by_week<'a, I>(
    records: I,
    now: DateTime<Utc>,
    numbering: WeekNumbering,
) -> Vec<WeeklyBucket>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let start = window_start(now);
    let mut weeks: HashMap<u32, (DateTime<Utc>, u32)> = HashMap::new();

    for record in records {
        let Some(timestamp) = parse_timestamp(&record.created_at) else {
            tracing::warn!(
                record_id = %record.id,
                created_at = %record.created_at,
                "Skipping activity record with unparseable timestamp"
            );
            continue;
        };

        if timestamp < start || timestamp > now {
            continue;
        }

        let week = numbering.week_of(timestamp.date_naive());
        let entry = weeks.entry(week).or_insert((timestamp, 0));
        entry.0 = entry.0.min(timestamp);
        entry.1 += 1;
    }

    let mut buckets: Vec<(u32, (DateTime<Utc>, u32))> = weeks.into_iter().collect();
    buckets.sort_by_key(|(week, (earliest, _))| (*earliest, *week));

    buckets
        .into_iter()
        .map(|(week_number, (_, count))| WeeklyBucket { week_number, count })
        .collect()
}
