//! Recommendation message templates
//!
//! Placeholders are written as `{name}` and filled by [`render`].

use rand::Rng;

pub const DISTRACTING_APPS: [&str; 3] = [
    "Consider limiting your time on {app} to improve productivity.",
    "You spent {duration} minutes on {app} today. Try to reduce this time tomorrow.",
    "High usage of {app} detected. Consider using app blockers during work hours.",
];

pub const CONTEXT_SWITCHING: [&str; 3] = [
    "You switched between applications {count} times in {duration} hours. Try to reduce context switching.",
    "Consider time-blocking your day to reduce the {count} context switches observed.",
    "High context switching detected ({count} switches). Try the Pomodoro technique to stay focused.",
];

/// Fixed templates: index 0 for productive bands, index 1 for unproductive bands
pub const WORK_HOURS: [&str; 2] = [
    "Your most productive hours appear to be between {start_hour} and {end_hour}. Consider scheduling important tasks during this time.",
    "You might want to avoid working during {start_hour} to {end_hour}, as this appears to be your least productive time.",
];

pub const BREAKS: [&str; 3] = [
    "You've been working for {duration} minutes without a break. Consider taking short breaks every 90 minutes.",
    "No breaks detected in your {duration}-minute work session. Try the 52/17 rule: 52 minutes of work followed by 17 minutes of rest.",
    "Regular breaks improve productivity. Try scheduling 5-minute breaks every hour.",
];

pub const PRODUCTIVE_APPS: [&str; 3] = [
    "You're most productive when using {app}. Consider maximizing your time with this application.",
    "Great job spending {duration} minutes on {app} today!",
    "{app} seems to be your most productive application. Try to increase usage during your peak productivity hours.",
];

/// Pick one template uniformly from the injected random source
pub fn choose<'a, R: Rng + ?Sized>(templates: &[&'a str], rng: &mut R) -> &'a str {
    templates[rng.gen_range(0..templates.len())]
}

/// Substitute `{key}` placeholders in one left-to-right pass.
///
/// Substituted values are copied verbatim and never scanned again; unknown
/// or unclosed placeholders are kept as written.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });

        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Format an hour of day on a 12-hour clock ("12 AM", "1 PM")
pub fn format_hour_12(hour: u32) -> String {
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    format!("{display} {suffix}")
}
