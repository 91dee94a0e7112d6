//! Context switch rate analysis

use super::{sorted_by_timestamp, templates};
use crate::types::{ActivityRecord, Recommendation, RecommendationDetail};
use rand::Rng;
use tracing::debug;

/// Flag a log whose app switches per hour exceed `threshold_per_hour`.
///
/// The rate is measured over the wall-clock span between the first and last
/// timestamp. Spans shorter than `min_span_hours` are too short to judge.
pub fn analyze_context_switching<R: Rng + ?Sized>(
    records: &[ActivityRecord],
    threshold_per_hour: f64,
    min_span_hours: f64,
    rng: &mut R,
) -> Vec<Recommendation> {
    let timed = sorted_by_timestamp(records);
    if timed.len() < 2 {
        return Vec::new();
    }

    // Sorted, so first and last bound the span
    let span_secs = (timed[timed.len() - 1].0 - timed[0].0).num_milliseconds() as f64 / 1000.0;
    let span_hours = span_secs / 3600.0;
    if span_hours < min_span_hours || span_hours <= 0.0 {
        debug!(span_hours, "context switching: span too short");
        return Vec::new();
    }

    let switches = count_switches(timed.iter().map(|(_, r)| r.app.as_str()));
    let per_hour = switches as f64 / span_hours;
    debug!(switches, span_hours, per_hour, "context switching analysis");

    if per_hour <= threshold_per_hour {
        return Vec::new();
    }

    let duration_hours = round_one_decimal(span_hours);
    let message = templates::render(
        templates::choose(&templates::CONTEXT_SWITCHING, rng),
        &[
            ("count", &switches.to_string()),
            ("duration", &format!("{duration_hours:.1}")),
        ],
    );

    vec![Recommendation::new(
        RecommendationDetail::ContextSwitching {
            count: switches,
            duration_hours,
        },
        message,
    )]
}

/// Number of adjacent pairs whose app differs
fn count_switches<'a>(apps: impl Iterator<Item = &'a str>) -> usize {
    let mut switches = 0;
    let mut previous: Option<&str> = None;
    for app in apps {
        if previous.is_some_and(|p| p != app) {
            switches += 1;
        }
        previous = Some(app);
    }
    switches
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::*;
    use crate::types::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_empty_input() {
        assert!(analyze_context_switching(&[], 10.0, 0.5, &mut rng()).is_empty());
    }

    #[test]
    fn test_single_record() {
        let records = vec![timed("A", Category::Neutral, 60, 9, 0)];
        assert!(analyze_context_switching(&records, 0.0, 0.5, &mut rng()).is_empty());
    }

    #[test]
    fn test_alternating_apps_over_one_hour() {
        let records = vec![
            timed("A", Category::Neutral, 60, 9, 0),
            timed("B", Category::Neutral, 60, 9, 30),
            timed("A", Category::Neutral, 60, 10, 0),
        ];

        let recs = analyze_context_switching(&records, 1.0, 0.5, &mut rng());

        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].detail,
            RecommendationDetail::ContextSwitching {
                count: 2,
                duration_hours: 1.0,
            }
        );
        assert!(recs[0].recommendation.contains('2'));
    }

    #[test]
    fn test_rate_at_threshold_not_flagged() {
        let records = vec![
            timed("A", Category::Neutral, 60, 9, 0),
            timed("B", Category::Neutral, 60, 9, 30),
            timed("A", Category::Neutral, 60, 10, 0),
        ];
        assert!(analyze_context_switching(&records, 2.0, 0.5, &mut rng()).is_empty());
    }

    #[test]
    fn test_short_span_ignored() {
        let records = vec![
            timed("A", Category::Neutral, 60, 9, 0),
            timed("B", Category::Neutral, 60, 9, 10),
            timed("A", Category::Neutral, 60, 9, 20),
        ];
        assert!(analyze_context_switching(&records, 0.0, 0.5, &mut rng()).is_empty());
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let records = vec![
            timed("A", Category::Neutral, 60, 10, 0),
            timed("A", Category::Neutral, 60, 9, 0),
            timed("B", Category::Neutral, 60, 9, 30),
        ];
        // Sorted: A(9:00) B(9:30) A(10:00) -> 2 switches
        let recs = analyze_context_switching(&records, 1.0, 0.5, &mut rng());
        assert!(matches!(
            recs[0].detail,
            RecommendationDetail::ContextSwitching { count: 2, .. }
        ));
    }

    #[test]
    fn test_untimed_records_ignored() {
        let records = vec![
            timed("A", Category::Neutral, 60, 9, 0),
            ActivityRecord::new("B"),
            timed("A", Category::Neutral, 60, 10, 0),
        ];
        assert!(analyze_context_switching(&records, 0.0, 0.5, &mut rng()).is_empty());
    }

    #[test]
    fn test_duration_rounded_to_one_decimal() {
        let records = vec![
            timed("A", Category::Neutral, 60, 9, 0),
            timed("B", Category::Neutral, 60, 9, 20),
            timed("C", Category::Neutral, 60, 10, 20),
        ];
        let recs = analyze_context_switching(&records, 1.0, 0.5, &mut rng());
        assert_eq!(
            recs[0].detail,
            RecommendationDetail::ContextSwitching {
                count: 2,
                duration_hours: 1.3,
            }
        );
    }

    #[test]
    fn test_count_switches() {
        assert_eq!(count_switches(["A", "A", "B", "B", "A"].into_iter()), 2);
        assert_eq!(count_switches(std::iter::empty()), 0);
    }
}
