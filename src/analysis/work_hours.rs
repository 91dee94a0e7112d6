//! Productive and unproductive hour-band detection
//!
//! Tracked time is bucketed by UTC hour of day. Hours with enough activity are
//! ranked by productive share; the top and bottom quartiles are reduced to
//! their longest run of consecutive hours, which becomes the suggested band.

use super::templates;
use crate::types::{
    ActivityRecord, Category, CategoryDistribution, Recommendation, RecommendationDetail,
};
use chrono::Timelike;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Productive share of tracked time for one hour of the day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRatio {
    pub hour: u32,
    pub total_secs: u64,
    pub ratio: f64,
}

/// Emit up to two recommendations: the most and least productive hour bands.
///
/// Hours with less than `significant_hour_secs` of categorised activity are
/// discarded. Quartile size is `max(1, n / 4)`; ranking ties are ordered by
/// ascending hour and every hour tied with the last admitted ratio is also
/// admitted. Output order is productive band first.
pub fn analyze_work_hours(
    records: &[ActivityRecord],
    significant_hour_secs: u64,
) -> Vec<Recommendation> {
    if !records
        .iter()
        .any(|r| r.timestamp.is_some() && r.category == Some(Category::Productive))
    {
        return Vec::new();
    }

    let buckets = bucket_by_hour(records);
    let hours = significant_hour_ratios(&buckets, significant_hour_secs);
    if hours.is_empty() {
        return Vec::new();
    }

    let quartile = (hours.len() / 4).max(1);
    let mut recommendations = Vec::with_capacity(2);

    let productive = top_hours(&hours, quartile, |a, b| b.total_cmp(a));
    if let Some((start, end)) = longest_consecutive_run(&productive) {
        recommendations.push(hour_band(start, end, true));
    }

    let unproductive = top_hours(&hours, quartile, |a, b| a.total_cmp(b));
    if let Some((start, end)) = longest_consecutive_run(&unproductive) {
        recommendations.push(hour_band(start, end, false));
    }

    debug!(
        significant_hours = hours.len(),
        quartile,
        candidates = recommendations.len(),
        "work hours analysis"
    );
    recommendations
}

/// Sum categorised time per UTC hour of day
fn bucket_by_hour(records: &[ActivityRecord]) -> BTreeMap<u32, CategoryDistribution> {
    let mut buckets: BTreeMap<u32, CategoryDistribution> = BTreeMap::new();
    for record in records {
        if let (Some(ts), Some(category)) = (record.timestamp, record.category) {
            buckets
                .entry(ts.hour())
                .or_default()
                .add(category, record.duration_secs());
        }
    }
    buckets
}

/// Productivity ratio for every hour with at least `min_secs` of activity, by hour
pub fn significant_hour_ratios(
    buckets: &BTreeMap<u32, CategoryDistribution>,
    min_secs: u64,
) -> Vec<HourRatio> {
    buckets
        .iter()
        .filter_map(|(&hour, dist)| {
            let total_secs = dist.total();
            trace!(hour, total_secs, productive = dist.productive, "hour bucket");
            if total_secs < min_secs || total_secs == 0 {
                return None;
            }
            Some(HourRatio {
                hour,
                total_secs,
                ratio: dist.productive as f64 / total_secs as f64,
            })
        })
        .collect()
}

/// The `count` best hours under `order`, plus any hours tied with the last one.
/// Returned hours are ascending.
fn top_hours<F>(hours: &[HourRatio], count: usize, order: F) -> Vec<u32>
where
    F: Fn(&f64, &f64) -> Ordering,
{
    let mut ranked: Vec<&HourRatio> = hours.iter().collect();
    ranked.sort_by(|a, b| order(&a.ratio, &b.ratio).then(a.hour.cmp(&b.hour)));

    let Some(cutoff) = ranked.get(count.saturating_sub(1)).map(|h| h.ratio) else {
        return Vec::new();
    };

    let mut selected: Vec<u32> = ranked
        .iter()
        .enumerate()
        .take_while(|(i, h)| *i < count || h.ratio == cutoff)
        .map(|(_, h)| h.hour)
        .collect();
    selected.sort_unstable();
    selected
}

/// Longest run of consecutive integers in an ascending slice, as `(first, last + 1)`.
/// The earliest run wins ties.
pub fn longest_consecutive_run(hours: &[u32]) -> Option<(u32, u32)> {
    let first = *hours.first()?;
    let mut best = (first, first);
    let mut current = (first, first);

    for &hour in &hours[1..] {
        if hour == current.1 + 1 {
            current.1 = hour;
        } else {
            current = (hour, hour);
        }
        if current.1 - current.0 > best.1 - best.0 {
            best = current;
        }
    }

    Some((best.0, best.1 + 1))
}

fn hour_band(start_hour: u32, end_hour: u32, is_productive: bool) -> Recommendation {
    let template = if is_productive {
        templates::WORK_HOURS[0]
    } else {
        templates::WORK_HOURS[1]
    };
    let message = templates::render(
        template,
        &[
            ("start_hour", &templates::format_hour_12(start_hour)),
            ("end_hour", &templates::format_hour_12(end_hour)),
        ],
    );
    Recommendation::new(
        RecommendationDetail::WorkHours {
            start_hour,
            end_hour,
            is_productive,
        },
        message,
    )
}
