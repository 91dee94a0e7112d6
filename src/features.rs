//! Productivity feature derivation
//!
//! Computes a log's productivity profile and a model-free productivity score.
//! The feature vector is what a trained predictor consumes; the score is the
//! fallback used when no trained model is available.

use crate::analysis::total_seconds;
use crate::types::{
    ActivityRecord, ActivitySummary, AppUsage, CategoryDistribution, ProductivityFeatures,
};
use chrono::Timelike;
use std::collections::HashMap;

/// Score reported for a log with no records
pub const EMPTY_LOG_SCORE: f64 = 50.0;

/// Default number of apps listed in a summary
pub const DEFAULT_TOP_APPS: usize = 5;

/// Feature deriver for activity logs
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Derive the productivity feature vector for one log
    pub fn extract(records: &[ActivityRecord]) -> ProductivityFeatures {
        if records.is_empty() {
            return ProductivityFeatures::default();
        }

        let distribution = category_distribution(records);
        let total_secs = total_seconds(records);
        let total = total_secs as f64;

        let share = |secs: u64| if total_secs > 0 { secs as f64 / total } else { 0.0 };

        // Every record boundary counts as a transition
        let switches_per_hour = if total_secs > 0 {
            (records.len() - 1) as f64 / (total / 3600.0)
        } else {
            0.0
        };

        let durations: Vec<f64> = records.iter().map(|r| r.duration_secs() as f64).collect();
        let (mean_duration, duration_std_dev) = mean_and_sample_std(&durations);

        let day_parts = day_part_seconds(records);

        ProductivityFeatures {
            productive_ratio: share(distribution.productive),
            neutral_ratio: share(distribution.neutral),
            distracting_ratio: share(distribution.distracting),
            switches_per_hour,
            mean_duration,
            duration_std_dev,
            morning_ratio: share(day_parts[0]),
            afternoon_ratio: share(day_parts[1]),
            evening_ratio: share(day_parts[2]),
            night_ratio: share(day_parts[3]),
        }
    }
}

/// Model-free productivity score (0-100): productive share of tracked time.
/// An empty log scores [`EMPTY_LOG_SCORE`].
pub fn productivity_score(records: &[ActivityRecord]) -> f64 {
    if records.is_empty() {
        return EMPTY_LOG_SCORE;
    }
    (FeatureExtractor::extract(records).productive_ratio * 100.0).clamp(0.0, 100.0)
}

/// Summarise a log: totals, category split, rounded score, top apps
pub fn summarize(records: &[ActivityRecord], top_n: usize) -> ActivitySummary {
    let distribution = category_distribution(records);
    let total_duration = total_seconds(records);

    let productivity_percent = if total_duration > 0 {
        (distribution.productive as f64 / total_duration as f64 * 100.0).round() as u32
    } else {
        0
    };

    ActivitySummary {
        record_count: records.len(),
        total_duration,
        distribution,
        productivity_percent,
        top_apps: top_apps(records, top_n),
    }
}

/// Apps ranked by total time, longest first; ties by name
pub fn top_apps(records: &[ActivityRecord], limit: usize) -> Vec<AppUsage> {
    let mut usage: HashMap<&str, u64> = HashMap::new();
    for record in records {
        let total = usage.entry(record.app.as_str()).or_insert(0);
        *total = total.saturating_add(record.duration_secs());
    }

    let mut ranked: Vec<AppUsage> = usage
        .into_iter()
        .map(|(app, duration)| AppUsage {
            app: app.to_string(),
            duration,
        })
        .collect();
    ranked.sort_by(|a, b| b.duration.cmp(&a.duration).then_with(|| a.app.cmp(&b.app)));
    ranked.truncate(limit);
    ranked
}

fn category_distribution(records: &[ActivityRecord]) -> CategoryDistribution {
    let mut distribution = CategoryDistribution::default();
    for record in records {
        if let Some(category) = record.category {
            distribution.add(category, record.duration_secs());
        }
    }
    distribution
}

/// Seconds in [morning, afternoon, evening, night] by UTC start hour
fn day_part_seconds(records: &[ActivityRecord]) -> [u64; 4] {
    let mut parts = [0u64; 4];
    for record in records {
        let Some(ts) = record.timestamp else {
            continue;
        };
        let slot = match ts.hour() {
            5..=11 => 0,
            12..=17 => 1,
            18..=23 => 2,
            _ => 3,
        };
        parts[slot] = parts[slot].saturating_add(record.duration_secs());
    }
    parts
}

/// Mean and sample (n - 1) standard deviation; deviation is 0 below two values
fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}
