//! Core data types for Synheart Coach
//!
//! Activity records flow in, recommendation candidates and summaries flow out.
//! Every output type is created fresh per call and owned by the caller.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Productivity category assigned to an activity record upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Productive,
    Neutral,
    Distracting,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Productive => "productive",
            Category::Neutral => "neutral",
            Category::Distracting => "distracting",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of time spent in an application window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Application or window identifier
    pub app: String,
    /// Window or tab title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Precomputed productivity category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Time spent, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// When the activity started (UTC)
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ActivityRecord {
    /// Create a record with only an app name
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            title: None,
            category: None,
            duration: None,
            timestamp: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Duration in seconds, treating a missing value as zero
    pub fn duration_secs(&self) -> u64 {
        self.duration.unwrap_or(0)
    }
}

/// Parse an ISO-8601 timestamp. Strings without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
    }
}

/// Kind of recommendation, one per pattern analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    DistractingApps,
    ContextSwitching,
    WorkHours,
    Breaks,
    ProductiveApps,
}

/// Type-specific fields of a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecommendationDetail {
    DistractingApps {
        app: String,
        /// Whole minutes spent in the app
        duration: u64,
    },
    ContextSwitching {
        count: usize,
        /// Observation span in hours, one decimal
        duration_hours: f64,
    },
    WorkHours {
        start_hour: u32,
        /// Exclusive end of the hour band
        end_hour: u32,
        is_productive: bool,
    },
    Breaks {
        duration_minutes: u64,
    },
    ProductiveApps {
        app: String,
        duration_minutes: u64,
    },
}

/// A rendered coaching suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub detail: RecommendationDetail,
    /// Natural-language message
    pub recommendation: String,
}

impl Recommendation {
    pub fn new(detail: RecommendationDetail, recommendation: String) -> Self {
        Self {
            detail,
            recommendation,
        }
    }

    pub fn kind(&self) -> RecommendationKind {
        match self.detail {
            RecommendationDetail::DistractingApps { .. } => RecommendationKind::DistractingApps,
            RecommendationDetail::ContextSwitching { .. } => RecommendationKind::ContextSwitching,
            RecommendationDetail::WorkHours { .. } => RecommendationKind::WorkHours,
            RecommendationDetail::Breaks { .. } => RecommendationKind::Breaks,
            RecommendationDetail::ProductiveApps { .. } => RecommendationKind::ProductiveApps,
        }
    }
}

/// Time tracked per category, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub productive: u64,
    pub neutral: u64,
    pub distracting: u64,
}

impl CategoryDistribution {
    pub fn add(&mut self, category: Category, seconds: u64) {
        match category {
            Category::Productive => self.productive = self.productive.saturating_add(seconds),
            Category::Neutral => self.neutral = self.neutral.saturating_add(seconds),
            Category::Distracting => {
                self.distracting = self.distracting.saturating_add(seconds)
            }
        }
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Productive => self.productive,
            Category::Neutral => self.neutral,
            Category::Distracting => self.distracting,
        }
    }

    pub fn total(&self) -> u64 {
        self.productive
            .saturating_add(self.neutral)
            .saturating_add(self.distracting)
    }
}

/// Time spent in one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUsage {
    pub app: String,
    /// Seconds
    pub duration: u64,
}

/// Aggregate view of one activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Number of records in the log
    pub record_count: usize,
    /// Total tracked time in seconds, categorised or not
    pub total_duration: u64,
    /// Tracked time per category
    pub distribution: CategoryDistribution,
    /// Productive share of tracked time as a whole percentage (0-100)
    pub productivity_percent: u32,
    /// Most used applications, longest first
    pub top_apps: Vec<AppUsage>,
}

/// Feature vector describing a log's productivity profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductivityFeatures {
    /// Share of tracked time in productive apps (0-1)
    pub productive_ratio: f64,
    /// Share of tracked time in neutral apps (0-1)
    pub neutral_ratio: f64,
    /// Share of tracked time in distracting apps (0-1)
    pub distracting_ratio: f64,
    /// Record transitions per tracked hour
    pub switches_per_hour: f64,
    /// Mean record duration in seconds
    pub mean_duration: f64,
    /// Sample standard deviation of record duration in seconds
    pub duration_std_dev: f64,
    /// Share of time between 05:00 and 11:59 UTC
    pub morning_ratio: f64,
    /// Share of time between 12:00 and 17:59 UTC
    pub afternoon_ratio: f64,
    /// Share of time between 18:00 and 23:59 UTC
    pub evening_ratio: f64,
    /// Share of time between 00:00 and 04:59 UTC
    pub night_ratio: f64,
}

/// Producer metadata embedded in every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Observation window covered by a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Earliest record timestamp (RFC3339)
    pub start: String,
    /// Latest record timestamp (RFC3339)
    pub end: String,
}

/// Full coaching report for one activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// When the report was computed (RFC3339)
    pub computed_at_utc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<ReportWindow>,
    pub summary: ActivitySummary,
    pub features: ProductivityFeatures,
    /// Model-free productivity estimate (0-100)
    pub productivity_score: f64,
    pub recommendations: Vec<Recommendation>,
    /// Extra metadata supplied by the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<BTreeMap<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Distracting).unwrap();
        assert_eq!(json, "\"distracting\"");

        let parsed: Category = serde_json::from_str("\"productive\"").unwrap();
        assert_eq!(parsed, Category::Productive);
    }

    #[test]
    fn test_record_deserialization_full() {
        let json = r#"{
            "app": "Visual Studio Code",
            "title": "index.js",
            "category": "productive",
            "duration": 3600,
            "timestamp": "2023-01-01T09:00:00Z"
        }"#;

        let record: ActivityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.app, "Visual Studio Code");
        assert_eq!(record.title.as_deref(), Some("index.js"));
        assert_eq!(record.category, Some(Category::Productive));
        assert_eq!(record.duration, Some(3600));
        assert_eq!(
            record.timestamp,
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_record_deserialization_minimal() {
        let record: ActivityRecord = serde_json::from_str(r#"{"app": "Slack"}"#).unwrap();
        assert_eq!(record.app, "Slack");
        assert!(record.category.is_none());
        assert!(record.timestamp.is_none());
        assert_eq!(record.duration_secs(), 0);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2023-01-01T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01T16:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<ActivityRecord, _> =
            serde_json::from_str(r#"{"app": "Slack", "timestamp": "not a time"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let rec = Recommendation::new(
            RecommendationDetail::DistractingApps {
                app: "X".to_string(),
                duration: 33,
            },
            "Consider limiting your time on X to improve productivity.".to_string(),
        );

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["type"], "distracting_apps");
        assert_eq!(value["app"], "X");
        assert_eq!(value["duration"], 33);
        assert!(value["recommendation"].is_string());
        assert_eq!(rec.kind(), RecommendationKind::DistractingApps);
    }

    #[test]
    fn test_distribution_totals() {
        let mut dist = CategoryDistribution::default();
        dist.add(Category::Productive, 100);
        dist.add(Category::Distracting, 50);
        dist.add(Category::Productive, 25);
        assert_eq!(dist.get(Category::Productive), 125);
        assert_eq!(dist.total(), 175);
    }

    #[test]
    fn test_distribution_saturates() {
        let mut dist = CategoryDistribution::default();
        dist.add(Category::Productive, u64::MAX);
        dist.add(Category::Productive, 10);
        dist.add(Category::Neutral, 10);
        assert_eq!(dist.productive, u64::MAX);
        assert_eq!(dist.total(), u64::MAX);
    }
}
