//! Recommendation engine orchestration
//!
//! This module provides the public API for coaching recommendations. It runs
//! every pattern analysis over one activity log, pools the candidates, and
//! returns a random selection bounded by the configured maximum.
//!
//! Stateless helpers take a whole log per call; [`CoachProcessor`] keeps a
//! session log in an [`ActivityStore`] and reports over it on demand.

use crate::adapter::{parse_activities, retain_valid};
use crate::analysis::{
    analyze_breaks, analyze_context_switching, analyze_distracting_apps,
    analyze_productive_apps, analyze_work_hours,
};
use crate::classifier::KeywordClassifier;
use crate::config::AnalyzerConfig;
use crate::encoder::ReportEncoder;
use crate::error::CoachError;
use crate::store::ActivityStore;
use crate::types::{ActivityRecord, CoachReport, Recommendation};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Generate recommendations from activity log JSON (stateless, one-shot).
///
/// # Arguments
/// * `activities_json` - JSON array of activity records, NDJSON, or `{"activities": [...]}`
/// * `max_recommendations` - Upper bound on returned recommendations
/// * `seed` - Fixes template choice and ordering; `None` draws from OS entropy
///
/// # Returns
/// JSON array of recommendations
///
/// # Example
/// ```ignore
/// let json = recommendations_to_json(activities_json, 3, Some(42))?;
/// ```
pub fn recommendations_to_json(
    activities_json: &str,
    max_recommendations: usize,
    seed: Option<u64>,
) -> Result<String, CoachError> {
    let records = retain_valid(parse_activities(activities_json)?);

    let engine = RecommendationEngine::new(AnalyzerConfig {
        max_recommendations,
        ..Default::default()
    })?;

    let mut rng = seeded_rng(seed);
    let recommendations = engine.generate(&records, &mut rng);

    serde_json::to_string(&recommendations).map_err(|e| CoachError::EncodingError(e.to_string()))
}

/// Encode a full coaching report from activity log JSON (stateless, one-shot).
///
/// Uses the default thresholds; `seed` fixes template choice and selection.
pub fn report_to_json(activities_json: &str, seed: Option<u64>) -> Result<String, CoachError> {
    let records = retain_valid(parse_activities(activities_json)?);
    let engine = RecommendationEngine::default();
    let encoder = ReportEncoder::new();

    let mut rng = seeded_rng(seed);
    let recommendations = engine.generate(&records, &mut rng);
    encoder.encode_to_json(&records, recommendations)
}

/// Build the random source used for template choice and final ordering
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Runs the pattern analyses with a fixed configuration.
///
/// The engine holds no mutable state, so one instance can serve any number of
/// callers concurrently. All randomness comes from the generator passed in.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: AnalyzerConfig,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }
}

impl RecommendationEngine {
    /// Create an engine, rejecting invalid configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self, CoachError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Every candidate from every analysis, in analysis order, before selection
    pub fn candidates<R: Rng + ?Sized>(
        &self,
        records: &[ActivityRecord],
        rng: &mut R,
    ) -> Vec<Recommendation> {
        let config = &self.config;
        let mut all = Vec::new();

        all.extend(analyze_distracting_apps(
            records,
            config.distracting_threshold_minutes,
            rng,
        ));
        all.extend(analyze_context_switching(
            records,
            config.switches_per_hour_threshold,
            config.min_switching_span_hours,
            rng,
        ));
        all.extend(analyze_work_hours(records, config.significant_hour_secs));
        all.extend(analyze_breaks(
            records,
            config.long_session_threshold_minutes,
            config.break_gap_secs,
            rng,
        ));
        all.extend(analyze_productive_apps(
            records,
            config.productive_threshold_minutes,
            rng,
        ));

        all
    }

    /// Run all analyses, shuffle the pooled candidates, keep at most
    /// `max_recommendations`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        records: &[ActivityRecord],
        rng: &mut R,
    ) -> Vec<Recommendation> {
        let mut all = self.candidates(records, rng);
        let pooled = all.len();

        all.shuffle(rng);
        all.truncate(self.config.max_recommendations);

        debug!(
            records = records.len(),
            pooled,
            returned = all.len(),
            "generated recommendations"
        );
        all
    }

    /// Same as [`generate`](Self::generate) with a generator seeded from `seed`
    pub fn generate_seeded(&self, records: &[ActivityRecord], seed: u64) -> Vec<Recommendation> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(records, &mut rng)
    }
}

/// Stateful processor for sessions that accumulate activity over time.
///
/// Incoming batches are validated, categorised where the tracker left the
/// category out, and appended to an owned [`ActivityStore`]. Recommendations
/// and reports always run over a snapshot of the store.
pub struct CoachProcessor {
    engine: RecommendationEngine,
    classifier: KeywordClassifier,
    encoder: ReportEncoder,
    store: ActivityStore,
}

impl Default for CoachProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl CoachProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            engine: RecommendationEngine::default(),
            classifier: KeywordClassifier::default(),
            encoder: ReportEncoder::new(),
            store: ActivityStore::new(),
        }
    }

    /// Create a processor with custom thresholds
    pub fn with_config(config: AnalyzerConfig) -> Result<Self, CoachError> {
        Ok(Self {
            engine: RecommendationEngine::new(config)?,
            ..Self::new()
        })
    }

    pub fn with_classifier(mut self, classifier: KeywordClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    /// Parse, validate and store a batch of activity JSON.
    /// Returns the number of records stored from this batch.
    pub fn ingest_json(&self, activities_json: &str) -> Result<usize, CoachError> {
        let parsed = parse_activities(activities_json)?;
        let received = parsed.len();

        let mut records = retain_valid(parsed);
        let filled = self.classifier.fill_missing_categories(&mut records);
        let stored = records.len();
        let total = self.store.extend(records)?;

        info!(received, stored, filled, total, "ingested activity batch");
        Ok(stored)
    }

    /// Recommendations over everything stored so far
    pub fn recommend(&self, seed: Option<u64>) -> Result<Vec<Recommendation>, CoachError> {
        let records = self.store.snapshot()?;
        Ok(self.engine.generate(&records, &mut seeded_rng(seed)))
    }

    /// Full report over everything stored so far
    pub fn report(&self, seed: Option<u64>) -> Result<CoachReport, CoachError> {
        let records = self.store.snapshot()?;
        self.report_over(&records, seed)
    }

    /// Report over records with `start <= timestamp < end`
    pub fn report_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        seed: Option<u64>,
    ) -> Result<CoachReport, CoachError> {
        let records = self.store.between(start, end)?;
        self.report_over(&records, seed)
    }

    /// Drop every stored record
    pub fn reset(&self) -> Result<(), CoachError> {
        self.store.clear()
    }

    fn report_over(
        &self,
        records: &[ActivityRecord],
        seed: Option<u64>,
    ) -> Result<CoachReport, CoachError> {
        let recommendations = self.engine.generate(records, &mut seeded_rng(seed));
        self.encoder.encode(records, recommendations, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;
    use crate::types::{Category, RecommendationKind};
    use std::collections::HashSet;

    fn busy_day() -> Vec<ActivityRecord> {
        // Triggers every analysis at once
        let mut records = vec![
            timed("Reddit", Category::Distracting, 2400, 8, 0),
            timed("YouTube", Category::Distracting, 2400, 8, 40),
            timed("Twitter", Category::Distracting, 2400, 9, 20),
        ];
        for minute in 0..60 {
            let app = if minute % 2 == 0 { "Code" } else { "Terminal" };
            records.push(timed(app, Category::Productive, 120, 10, minute));
        }
        records
    }

    #[test]
    fn test_empty_input() {
        let engine = RecommendationEngine::default();
        assert!(engine.generate_seeded(&[], 1).is_empty());
        assert!(engine.candidates(&[], &mut seeded_rng(Some(1))).is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RecommendationEngine::new(AnalyzerConfig {
            max_recommendations: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(CoachError::InvalidConfig(_))));
    }

    #[test]
    fn test_never_exceeds_max() {
        let records = busy_day();
        let engine = RecommendationEngine::default();
        assert!(engine.candidates(&records, &mut seeded_rng(Some(0))).len() > 3);

        for seed in 0..20 {
            assert_eq!(engine.generate_seeded(&records, seed).len(), 3);
        }
    }

    #[test]
    fn test_returns_all_when_fewer_than_max() {
        let records = vec![record("X", Category::Distracting, 2000)];
        let engine = RecommendationEngine::default();
        let recs = engine.generate_seeded(&records, 9);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind(), RecommendationKind::DistractingApps);
    }

    #[test]
    fn test_same_seed_same_output() {
        let records = busy_day();
        let engine = RecommendationEngine::default();
        assert_eq!(
            engine.generate_seeded(&records, 42),
            engine.generate_seeded(&records, 42)
        );
    }

    #[test]
    fn test_every_analysis_contributes() {
        let records = busy_day();
        let engine = RecommendationEngine::default();
        let kinds: HashSet<RecommendationKind> = engine
            .candidates(&records, &mut seeded_rng(Some(0)))
            .iter()
            .map(|r| r.kind())
            .collect();

        assert!(kinds.contains(&RecommendationKind::DistractingApps));
        assert!(kinds.contains(&RecommendationKind::ContextSwitching));
        assert!(kinds.contains(&RecommendationKind::WorkHours));
        assert!(kinds.contains(&RecommendationKind::Breaks));
        assert!(kinds.contains(&RecommendationKind::ProductiveApps));
    }

    #[test]
    fn test_selection_varies_with_seed() {
        let records = busy_day();
        let engine = RecommendationEngine::new(AnalyzerConfig {
            max_recommendations: 1,
            ..Default::default()
        })
        .unwrap();

        let picked: HashSet<String> = (0..50)
            .map(|seed| engine.generate_seeded(&records, seed)[0].recommendation.clone())
            .collect();
        assert!(picked.len() > 1);
    }

    #[test]
    fn test_recommendations_to_json() {
        let json = r#"[
            {"app": "X", "category": "distracting", "duration": 1900},
            {"app": "X", "category": "distracting", "duration": 100}
        ]"#;

        let out = recommendations_to_json(json, 3, Some(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let recs = value.as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["type"], "distracting_apps");
        assert_eq!(recs[0]["app"], "X");
        assert_eq!(recs[0]["duration"], 33);
    }

    #[test]
    fn test_recommendations_to_json_rejects_zero_max() {
        assert!(recommendations_to_json("[]", 0, Some(1)).is_err());
    }

    #[test]
    fn test_recommendations_to_json_invalid_input() {
        assert!(recommendations_to_json("not json", 3, None).is_err());
    }

    #[test]
    fn test_report_to_json() {
        let json = r#"[{"app": "Code", "category": "productive", "duration": 3600}]"#;
        let out = report_to_json(json, Some(3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["productivity_score"], 100.0);
        assert_eq!(value["recommendations"][0]["type"], "productive_apps");
    }

    #[test]
    fn test_processor_accumulates_batches() {
        let processor = CoachProcessor::new();
        let first = r#"[{"app": "Reddit", "duration": 1200, "timestamp": "2023-01-01T08:00:00Z"}]"#;
        let second = r#"{"app": "Reddit", "duration": 1200, "timestamp": "2023-01-01T08:20:00Z"}
{"app": "", "duration": 60}"#;

        assert_eq!(processor.ingest_json(first).unwrap(), 1);
        // Invalid record is dropped
        assert_eq!(processor.ingest_json(second).unwrap(), 1);
        assert_eq!(processor.store().len().unwrap(), 2);

        // Missing categories are filled by keyword, so 40 minutes of Reddit is flagged
        let recs = processor.recommend(Some(1)).unwrap();
        assert!(recs.iter().any(|r| r.detail
            == crate::types::RecommendationDetail::DistractingApps {
                app: "Reddit".to_string(),
                duration: 40,
            }));
    }

    #[test]
    fn test_processor_report_between() {
        let processor = CoachProcessor::new();
        processor.store().extend(sample_day()).unwrap();

        let report = processor.report_between(at(9, 0), at(11, 0), Some(2)).unwrap();
        assert_eq!(report.summary.record_count, 3);

        processor.reset().unwrap();
        assert_eq!(processor.report(None).unwrap().summary.record_count, 0);
    }

    #[test]
    fn test_processor_rejects_invalid_config() {
        let config = AnalyzerConfig {
            distracting_threshold_minutes: -1.0,
            ..Default::default()
        };
        assert!(CoachProcessor::with_config(config).is_err());
    }

    #[test]
    fn test_one_shot_paths_drop_oversized_records() {
        let json = format!(
            r#"[
                {{"app": "X", "category": "distracting", "duration": {}, "timestamp": "2023-01-01T09:00:00Z"}},
                {{"app": "X", "category": "distracting", "duration": 10, "timestamp": "2023-01-01T09:05:00Z"}}
            ]"#,
            u64::MAX
        );

        assert_eq!(recommendations_to_json(&json, 3, Some(1)).unwrap(), "[]");

        let report: CoachReport =
            serde_json::from_str(&report_to_json(&json, Some(1)).unwrap()).unwrap();
        assert_eq!(report.summary.record_count, 1);
        assert_eq!(report.summary.total_duration, 10);
    }

}
