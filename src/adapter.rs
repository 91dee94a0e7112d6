//! Activity log adapter
//!
//! Parses activity logs exported by the desktop tracker and checks individual
//! records before they reach the analyses. Accepted layouts:
//! - JSON array of records
//! - `{"activities": [...]}` envelope, as posted by the tracker's IPC bridge
//! - NDJSON, one record per line

use crate::error::CoachError;
use crate::types::ActivityRecord;
use serde::Deserialize;
use tracing::warn;

/// Upper bound on a single record's duration (one full day)
pub const MAX_RECORD_DURATION_SECS: u64 = 86_400;

#[derive(Deserialize)]
struct ActivityEnvelope {
    activities: Vec<ActivityRecord>,
}

/// Parse an activity log in any supported layout. Blank input yields no records.
pub fn parse_activities(input: &str) -> Result<Vec<ActivityRecord>, CoachError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return parse_array(trimmed);
    }

    if let Ok(envelope) = serde_json::from_str::<ActivityEnvelope>(trimmed) {
        return Ok(envelope.activities);
    }

    parse_ndjson(trimmed)
}

/// Parse a JSON string containing an array of records
pub fn parse_array(json: &str) -> Result<Vec<ActivityRecord>, CoachError> {
    serde_json::from_str(json)
        .map_err(|e| CoachError::ParseError(format!("Failed to parse activity array: {}", e)))
}

/// Parse NDJSON (newline-delimited JSON) containing records
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<ActivityRecord>, CoachError> {
    let mut records = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityRecord>(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                return Err(CoachError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(records)
}

/// Check a single record for values the analyses cannot use
pub fn validate_record(record: &ActivityRecord) -> Result<(), CoachError> {
    if record.app.trim().is_empty() {
        return Err(CoachError::InvalidRecord("app must not be empty".to_string()));
    }

    if let Some(duration) = record.duration {
        if duration > MAX_RECORD_DURATION_SECS {
            return Err(CoachError::InvalidRecord(format!(
                "duration {} exceeds one day ({} seconds)",
                duration, MAX_RECORD_DURATION_SECS
            )));
        }
    }

    Ok(())
}

/// Result of record validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub app: String,
    pub error: CoachError,
}

/// Validate a batch of records, returning only the failures
pub fn validate_records(records: &[ActivityRecord]) -> Vec<ValidationResult> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            validate_record(record).err().map(|error| ValidationResult {
                index,
                app: record.app.clone(),
                error,
            })
        })
        .collect()
}

/// Drop records that fail validation, logging each one
pub fn retain_valid(records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
    records
        .into_iter()
        .enumerate()
        .filter(|(index, record)| match validate_record(record) {
            Ok(()) => true,
            Err(e) => {
                warn!(index, app = %record.app, error = %e, "dropping invalid activity record");
                false
            }
        })
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"app": "Visual Studio Code", "title": "index.js", "category": "productive", "duration": 3600, "timestamp": "2023-01-01T09:00:00Z"},
            {"app": "Chrome", "title": "YouTube", "category": "distracting", "duration": 1800, "timestamp": "2023-01-01T10:30:00Z"}
        ]"#;

        let records = parse_activities(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].category, Some(Category::Distracting));
    }

    #[test]
    fn test_parse_envelope() {
        let json = r#"{"activities": [{"app": "Slack", "duration": 900}], "max_recommendations": 3}"#;
        let records = parse_activities(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].app, "Slack");
    }

    #[test]
    fn test_parse_ndjson() {
        let ndjson = r#"{"app": "Terminal", "category": "productive", "duration": 600}

{"app": "Reddit", "category": "distracting", "duration": 300}"#;

        let records = parse_activities(ndjson).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].app, "Terminal");
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let ndjson = "{\"app\": \"Terminal\"}\n{broken";
        let err = parse_ndjson(ndjson).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(parse_activities("   \n").unwrap().is_empty());
        assert!(parse_activities("[]").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_activities("not valid json").is_err());
        assert!(parse_activities("[{\"title\": \"no app\"}]").is_err());
    }

    #[test]
    fn test_validate_records() {
        let records = vec![
            ActivityRecord::new("Code").with_duration(600),
            ActivityRecord::new("  "),
            ActivityRecord::new("Chrome").with_duration(100_000),
        ];

        let failures = validate_records(&records);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[1].index, 2);
        assert!(matches!(failures[1].error, CoachError::InvalidRecord(_)));

        let kept = retain_valid(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].app, "Code");
    }
}
