//! Pattern analyses over an activity log
//!
//! Each analysis reduces a log to zero or more recommendation candidates.
//! Analyses are independent, hold no state, and never fail: missing fields or
//! too little data simply produce no candidates.
//!
//! Pipeline: Records → Analyses (distracting apps, context switching, work
//! hours, breaks, productive apps) → Engine (shuffle + truncate)

pub mod breaks;
pub mod context_switching;
pub mod distracting_apps;
pub mod productive_apps;
pub mod templates;
pub mod work_hours;

pub use breaks::analyze_breaks;
pub use context_switching::analyze_context_switching;
pub use distracting_apps::analyze_distracting_apps;
pub use productive_apps::analyze_productive_apps;
pub use work_hours::analyze_work_hours;

use crate::types::{ActivityRecord, Category};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Total seconds per app for records in `category`, keyed in app-name order
pub(crate) fn seconds_by_app(
    records: &[ActivityRecord],
    category: Category,
) -> BTreeMap<&str, u64> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.category == Some(category)) {
        let total = totals.entry(record.app.as_str()).or_insert(0);
        *total = total.saturating_add(record.duration_secs());
    }
    totals
}

/// Records carrying a timestamp, stably sorted by it
pub(crate) fn sorted_by_timestamp(
    records: &[ActivityRecord],
) -> Vec<(DateTime<Utc>, &ActivityRecord)> {
    let mut timed: Vec<(DateTime<Utc>, &ActivityRecord)> = records
        .iter()
        .filter_map(|r| r.timestamp.map(|ts| (ts, r)))
        .collect();
    timed.sort_by_key(|(ts, _)| *ts);
    timed
}

/// Sum of record durations, saturating at `u64::MAX`
pub(crate) fn total_seconds(records: &[ActivityRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.duration_secs()))
}

/// Seconds expressed as fractional minutes
pub(crate) fn to_minutes(seconds: u64) -> f64 {
    seconds as f64 / 60.0
}
