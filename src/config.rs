//! Analyzer configuration
//!
//! Every threshold used by the pattern analyses lives here so callers can
//! override them individually. Defaults match the coaching rules shipped with
//! the desktop app.

use crate::error::CoachError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Distracting app usage above this many minutes triggers a suggestion
pub const DEFAULT_DISTRACTING_THRESHOLD_MINUTES: f64 = 30.0;

/// App switches per hour above which context switching is flagged
pub const DEFAULT_SWITCHES_PER_HOUR_THRESHOLD: f64 = 10.0;

/// Shortest observation span (hours) worth measuring switch rate over
pub const DEFAULT_MIN_SWITCHING_SPAN_HOURS: f64 = 0.5;

/// Hours with less tracked time than this (seconds) are ignored
pub const DEFAULT_SIGNIFICANT_HOUR_SECS: u64 = 900;

/// Sessions longer than this many minutes without a break are flagged
pub const DEFAULT_LONG_SESSION_THRESHOLD_MINUTES: f64 = 90.0;

/// Gap between records (seconds) that counts as a break
pub const DEFAULT_BREAK_GAP_SECS: i64 = 300;

/// Productive app usage above this many minutes earns a suggestion
pub const DEFAULT_PRODUCTIVE_THRESHOLD_MINUTES: f64 = 30.0;

/// Maximum recommendations returned per call
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// Thresholds for the pattern analyses and the final selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub distracting_threshold_minutes: f64,
    pub switches_per_hour_threshold: f64,
    pub min_switching_span_hours: f64,
    pub significant_hour_secs: u64,
    pub long_session_threshold_minutes: f64,
    pub break_gap_secs: i64,
    pub productive_threshold_minutes: f64,
    pub max_recommendations: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            distracting_threshold_minutes: DEFAULT_DISTRACTING_THRESHOLD_MINUTES,
            switches_per_hour_threshold: DEFAULT_SWITCHES_PER_HOUR_THRESHOLD,
            min_switching_span_hours: DEFAULT_MIN_SWITCHING_SPAN_HOURS,
            significant_hour_secs: DEFAULT_SIGNIFICANT_HOUR_SECS,
            long_session_threshold_minutes: DEFAULT_LONG_SESSION_THRESHOLD_MINUTES,
            break_gap_secs: DEFAULT_BREAK_GAP_SECS,
            productive_threshold_minutes: DEFAULT_PRODUCTIVE_THRESHOLD_MINUTES,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoachError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self, CoachError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoachError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, CoachError> {
        serde_json::to_string_pretty(self).map_err(|e| CoachError::EncodingError(e.to_string()))
    }

    /// Reject settings that would yield empty or meaningless output
    pub fn validate(&self) -> Result<(), CoachError> {
        if self.max_recommendations == 0 {
            return Err(CoachError::InvalidConfig(
                "max_recommendations must be at least 1".to_string(),
            ));
        }

        let thresholds = [
            ("distracting_threshold_minutes", self.distracting_threshold_minutes),
            ("switches_per_hour_threshold", self.switches_per_hour_threshold),
            ("min_switching_span_hours", self.min_switching_span_hours),
            ("long_session_threshold_minutes", self.long_session_threshold_minutes),
            ("productive_threshold_minutes", self.productive_threshold_minutes),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(CoachError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.break_gap_secs < 0 {
            return Err(CoachError::InvalidConfig(format!(
                "break_gap_secs must be non-negative, got {}",
                self.break_gap_secs
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.distracting_threshold_minutes, 30.0);
        assert_eq!(config.switches_per_hour_threshold, 10.0);
        assert_eq!(config.long_session_threshold_minutes, 90.0);
        assert_eq!(config.productive_threshold_minutes, 30.0);
        assert_eq!(config.significant_hour_secs, 900);
        assert_eq!(config.break_gap_secs, 300);
        assert_eq!(config.max_recommendations, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalyzerConfig::from_json(r#"{"max_recommendations": 5}"#).unwrap();
        assert_eq!(config.max_recommendations, 5);
        assert_eq!(config.distracting_threshold_minutes, 30.0);
    }

    #[test]
    fn test_zero_max_recommendations_rejected() {
        let config = AnalyzerConfig {
            max_recommendations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoachError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = AnalyzerConfig::from_json(r#"{"switches_per_hour_threshold": -1.0}"#);
        assert!(matches!(result, Err(CoachError::InvalidConfig(_))));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = AnalyzerConfig {
            productive_threshold_minutes: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalyzerConfig {
            break_gap_secs: 600,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(AnalyzerConfig::from_json(&json).unwrap(), config);
    }
}
