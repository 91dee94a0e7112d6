//! Most productive application

use super::{seconds_by_app, templates, to_minutes};
use crate::types::{ActivityRecord, Category, Recommendation, RecommendationDetail};
use rand::Rng;
use tracing::debug;

/// Praise the productive app with the most time, if it exceeds `threshold_minutes`.
/// Ties go to the app whose name sorts first.
pub fn analyze_productive_apps<R: Rng + ?Sized>(
    records: &[ActivityRecord],
    threshold_minutes: f64,
    rng: &mut R,
) -> Vec<Recommendation> {
    let best = seconds_by_app(records, Category::Productive)
        .into_iter()
        .filter(|(_, seconds)| to_minutes(*seconds) > threshold_minutes)
        .fold(None, |best: Option<(&str, u64)>, (app, seconds)| match best {
            Some((_, top)) if top >= seconds => best,
            _ => Some((app, seconds)),
        });

    debug!(top_app = ?best.map(|(app, _)| app), "productive app analysis");

    let Some((app, seconds)) = best else {
        return Vec::new();
    };

    let minutes = seconds / 60;
    let message = templates::render(
        templates::choose(&templates::PRODUCTIVE_APPS, rng),
        &[("app", app), ("duration", &minutes.to_string())],
    );

    vec![Recommendation::new(
        RecommendationDetail::ProductiveApps {
            app: app.to_string(),
            duration_minutes: minutes,
        },
        message,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn test_empty_input() {
        assert!(analyze_productive_apps(&[], 30.0, &mut rng()).is_empty());
    }

    #[test]
    fn test_picks_single_top_app() {
        let records = vec![
            record("Terminal", Category::Productive, 2400),
            record("Visual Studio Code", Category::Productive, 3600),
            record("Visual Studio Code", Category::Productive, 3600),
            record("YouTube", Category::Distracting, 20_000),
        ];

        let recs = analyze_productive_apps(&records, 30.0, &mut rng());
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].detail,
            RecommendationDetail::ProductiveApps {
                app: "Visual Studio Code".to_string(),
                duration_minutes: 120,
            }
        );
    }

    #[test]
    fn test_nothing_over_threshold() {
        let records = vec![record("Terminal", Category::Productive, 1800)];
        assert!(analyze_productive_apps(&records, 30.0, &mut rng()).is_empty());
    }

    #[test]
    fn test_tie_goes_to_first_name() {
        let records = vec![
            record("Zed", Category::Productive, 3000),
            record("Emacs", Category::Productive, 3000),
        ];
        let recs = analyze_productive_apps(&records, 30.0, &mut rng());
        assert!(matches!(
            &recs[0].detail,
            RecommendationDetail::ProductiveApps { app, .. } if app == "Emacs"
        ));
    }

    #[test]
    fn test_stub_rng_selects_first_template() {
        let records = vec![record("Figma", Category::Productive, 4000)];
        let recs = analyze_productive_apps(&records, 30.0, &mut StepRng::new(0, 0));
        assert_eq!(
            recs[0].recommendation,
            "You're most productive when using Figma. Consider maximizing your time with this application."
        );
    }
}
