//! Report encoding
//!
//! This module wraps a log's summary, features, score and recommendations into
//! a versioned report payload with producer metadata.

use crate::error::CoachError;
use crate::features::{productivity_score, summarize, FeatureExtractor, DEFAULT_TOP_APPS};
use crate::types::{ActivityRecord, CoachReport, Recommendation, ReportProducer, ReportWindow};
use crate::{COACH_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for coaching reports
pub struct ReportEncoder {
    instance_id: String,
    top_apps: usize,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            top_apps: DEFAULT_TOP_APPS,
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            instance_id,
            top_apps: DEFAULT_TOP_APPS,
        }
    }

    /// Number of apps listed in the report summary
    pub fn with_top_apps(mut self, top_apps: usize) -> Self {
        self.top_apps = top_apps;
        self
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode a log and its recommendations into a report
    pub fn encode(
        &self,
        records: &[ActivityRecord],
        recommendations: Vec<Recommendation>,
        meta: Option<BTreeMap<String, Value>>,
    ) -> Result<CoachReport, CoachError> {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: COACH_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let score = productivity_score(records);
        if !score.is_finite() {
            return Err(CoachError::EncodingError(format!(
                "productivity score is not finite: {score}"
            )));
        }

        Ok(CoachReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            window: observation_window(records),
            summary: summarize(records, self.top_apps),
            features: FeatureExtractor::extract(records),
            productivity_score: score,
            recommendations,
            meta,
        })
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        records: &[ActivityRecord],
        recommendations: Vec<Recommendation>,
    ) -> Result<String, CoachError> {
        let report = self.encode(records, recommendations, None)?;
        serde_json::to_string_pretty(&report).map_err(CoachError::JsonError)
    }
}

/// Earliest and latest record timestamps, if any record carries one
fn observation_window(records: &[ActivityRecord]) -> Option<ReportWindow> {
    let mut timestamps = records.iter().filter_map(|r| r.timestamp);
    let first = timestamps.next()?;
    let (start, end) = timestamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));

    Some(ReportWindow {
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
    })
}
