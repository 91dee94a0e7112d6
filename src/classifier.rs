//! Keyword-based activity categorisation
//!
//! Assigns a productivity category from the app name and window title when the
//! upstream tracker did not supply one. Matching is a case-insensitive
//! substring search against fixed keyword lists.

use crate::types::{ActivityRecord, Category};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Editors, terminals, office suites, planning, design and meeting tools
#[rustfmt::skip]
pub const DEFAULT_PRODUCTIVE_KEYWORDS: &[&str] = &[
    "code", "visual studio", "intellij", "pycharm", "webstorm", "phpstorm", "rubymine",
    "terminal", "cmd", "powershell", "bash", "zsh", "iterm",
    "word", "excel", "powerpoint", "outlook", "onenote", "access",
    "google docs", "google sheets", "google slides", "google drive",
    "notion", "evernote", "trello", "asana", "jira", "confluence",
    "figma", "sketch", "adobe xd", "photoshop", "illustrator", "indesign",
    "zoom", "teams", "slack", "discord", "skype", "webex",
];

/// Browsers, file managers, system utilities, messaging and music
#[rustfmt::skip]
pub const DEFAULT_NEUTRAL_KEYWORDS: &[&str] = &[
    "chrome", "firefox", "safari", "edge", "opera", "brave",
    "finder", "explorer", "file explorer", "files",
    "calculator", "calendar", "clock", "weather",
    "mail", "messages", "telegram", "whatsapp", "signal",
    "spotify", "apple music", "itunes", "music",
    "settings", "system preferences", "control panel",
];

/// Streaming, social media, games and shopping
#[rustfmt::skip]
pub const DEFAULT_DISTRACTING_KEYWORDS: &[&str] = &[
    "youtube", "netflix", "hulu", "disney+", "prime video", "twitch",
    "facebook", "instagram", "twitter", "tiktok", "reddit", "pinterest",
    "games", "steam", "epic games", "battle.net", "origin", "uplay",
    "minecraft", "fortnite", "league of legends", "valorant", "apex legends",
    "shopping", "amazon", "ebay", "etsy", "walmart", "target",
];

/// Keyword lists used to categorise records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordClassifier {
    pub productive: Vec<String>,
    pub neutral: Vec<String>,
    pub distracting: Vec<String>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRODUCTIVE_KEYWORDS,
            DEFAULT_NEUTRAL_KEYWORDS,
            DEFAULT_DISTRACTING_KEYWORDS,
        )
    }
}

impl KeywordClassifier {
    pub fn new(productive: &[&str], neutral: &[&str], distracting: &[&str]) -> Self {
        let lower = |words: &[&str]| words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            productive: lower(productive),
            neutral: lower(neutral),
            distracting: lower(distracting),
        }
    }

    /// Categorise an app and optional window title.
    ///
    /// A distracting title wins first, so a browser tab on a video site is
    /// distracting even though the browser itself is neutral. Otherwise
    /// productive keywords are checked before distracting ones, and anything
    /// unmatched is neutral.
    pub fn classify(&self, app: &str, title: Option<&str>) -> Category {
        let app = app.to_lowercase();
        let title = title.map(str::to_lowercase).unwrap_or_default();

        if matches_any(&title, &self.distracting) {
            return Category::Distracting;
        }

        let haystack = format!("{app} {title}");
        if matches_any(&haystack, &self.productive) {
            Category::Productive
        } else if matches_any(&haystack, &self.distracting) {
            Category::Distracting
        } else {
            Category::Neutral
        }
    }

    pub fn classify_record(&self, record: &ActivityRecord) -> Category {
        self.classify(&record.app, record.title.as_deref())
    }

    /// Assign categories to records that lack one. Returns how many were filled.
    pub fn fill_missing_categories(&self, records: &mut [ActivityRecord]) -> usize {
        let mut filled = 0;
        for record in records.iter_mut().filter(|r| r.category.is_none()) {
            record.category = Some(self.classify_record(record));
            filled += 1;
        }
        debug!(filled, "filled missing categories");
        filled
    }
}

fn matches_any(haystack: &str, keywords: &[String]) -> bool {
    !haystack.is_empty() && keywords.iter().any(|k| haystack.contains(k.as_str()))
}
