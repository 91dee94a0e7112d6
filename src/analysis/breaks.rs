//! Long-session (missing break) detection
//!
//! A gap between consecutive records longer than the break gap ends a work
//! session. Session length is the sum of the records' own durations, not the
//! wall-clock span.

use super::{sorted_by_timestamp, templates, to_minutes};
use crate::types::{ActivityRecord, Recommendation, RecommendationDetail};
use rand::Rng;
use tracing::debug;

/// Emit one recommendation for the longest session exceeding `threshold_minutes`
pub fn analyze_breaks<R: Rng + ?Sized>(
    records: &[ActivityRecord],
    threshold_minutes: f64,
    break_gap_secs: i64,
    rng: &mut R,
) -> Vec<Recommendation> {
    let timed = sorted_by_timestamp(records);
    if !timed.iter().any(|(_, r)| r.duration.is_some()) {
        return Vec::new();
    }

    let sessions = session_durations(
        &timed.iter().map(|(ts, r)| (*ts, r.duration_secs())).collect::<Vec<_>>(),
        break_gap_secs,
    );

    let longest = sessions
        .iter()
        .map(|&secs| to_minutes(secs))
        .filter(|&minutes| minutes > threshold_minutes)
        .fold(None, |best: Option<f64>, minutes| {
            Some(best.map_or(minutes, |b| b.max(minutes)))
        });

    debug!(
        sessions = sessions.len(),
        longest_minutes = ?longest,
        threshold_minutes,
        "break analysis"
    );

    let Some(longest) = longest else {
        return Vec::new();
    };

    let duration_minutes = longest as u64;
    let message = templates::render(
        templates::choose(&templates::BREAKS, rng),
        &[("duration", &duration_minutes.to_string())],
    );

    vec![Recommendation::new(
        RecommendationDetail::Breaks { duration_minutes },
        message,
    )]
}

/// Split `(timestamp, seconds)` pairs, already sorted, into session totals.
///
/// A session closes after any record followed by a gap strictly greater than
/// `break_gap_secs`, and at the end of the list. Empty sessions are dropped.
pub fn session_durations(
    entries: &[(chrono::DateTime<chrono::Utc>, u64)],
    break_gap_secs: i64,
) -> Vec<u64> {
    let mut sessions = Vec::new();
    let mut current: u64 = 0;

    for (i, (ts, seconds)) in entries.iter().enumerate() {
        current = current.saturating_add(*seconds);

        let is_break = entries
            .get(i + 1)
            .map(|(next, _)| {
                (*next - *ts).num_milliseconds() > break_gap_secs.saturating_mul(1000)
            })
            .unwrap_or(true);

        if is_break {
            if current > 0 {
                sessions.push(current);
            }
            current = 0;
        }
    }

    if current > 0 {
        sessions.push(current);
    }

    sessions
}
