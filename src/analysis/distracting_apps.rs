//! Distracting app detection
//!
//! Sums time per distracting app and emits one suggestion for every app whose
//! total exceeds the threshold.

use super::{seconds_by_app, templates, to_minutes};
use crate::types::{ActivityRecord, Category, Recommendation, RecommendationDetail};
use rand::Rng;
use tracing::debug;

/// Emit one recommendation per distracting app used longer than `threshold_minutes`
pub fn analyze_distracting_apps<R: Rng + ?Sized>(
    records: &[ActivityRecord],
    threshold_minutes: f64,
    rng: &mut R,
) -> Vec<Recommendation> {
    let recommendations: Vec<Recommendation> = seconds_by_app(records, Category::Distracting)
        .into_iter()
        .filter(|(_, seconds)| to_minutes(*seconds) > threshold_minutes)
        .map(|(app, seconds)| {
            let minutes = seconds / 60;
            let message = templates::render(
                templates::choose(&templates::DISTRACTING_APPS, rng),
                &[("app", app), ("duration", &minutes.to_string())],
            );
            Recommendation::new(
                RecommendationDetail::DistractingApps {
                    app: app.to_string(),
                    duration: minutes,
                },
                message,
            )
        })
        .collect();

    debug!(
        candidates = recommendations.len(),
        threshold_minutes, "distracting app analysis"
    );
    recommendations
}
