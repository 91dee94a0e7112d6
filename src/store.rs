//! In-memory activity store
//!
//! Holds the records collected during a session. The store is an explicitly
//! owned value that hosts can share behind an `Arc`; readers never block each
//! other and analyses always run over a snapshot, never over the live log.

use crate::error::CoachError;
use crate::types::ActivityRecord;
use chrono::{DateTime, Utc};
use std::sync::RwLock;
use tracing::trace;

/// Lock-guarded, append-only activity log
#[derive(Debug, Default)]
pub struct ActivityStore {
    records: RwLock<Vec<ActivityRecord>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ActivityRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Append one record
    pub fn record(&self, record: ActivityRecord) -> Result<(), CoachError> {
        let mut guard = self.records.write().map_err(|_| CoachError::StorePoisoned)?;
        guard.push(record);
        trace!(len = guard.len(), "activity recorded");
        Ok(())
    }

    /// Append a batch of records, returning the new length
    pub fn extend<I>(&self, records: I) -> Result<usize, CoachError>
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let mut guard = self.records.write().map_err(|_| CoachError::StorePoisoned)?;
        guard.extend(records);
        Ok(guard.len())
    }

    /// Copy of every stored record, in insertion order
    pub fn snapshot(&self) -> Result<Vec<ActivityRecord>, CoachError> {
        let guard = self.records.read().map_err(|_| CoachError::StorePoisoned)?;
        Ok(guard.clone())
    }

    /// Timestamped records with `start <= timestamp < end`
    pub fn between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ActivityRecord>, CoachError> {
        if start > end {
            return Err(CoachError::InvalidTimestamp(format!(
                "window start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }

        let guard = self.records.read().map_err(|_| CoachError::StorePoisoned)?;
        Ok(guard
            .iter()
            .filter(|r| matches!(r.timestamp, Some(ts) if ts >= start && ts < end))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize, CoachError> {
        let guard = self.records.read().map_err(|_| CoachError::StorePoisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, CoachError> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<(), CoachError> {
        let mut guard = self.records.write().map_err(|_| CoachError::StorePoisoned)?;
        guard.clear();
        Ok(())
    }

    /// Take every record out, leaving the store empty
    pub fn drain(&self) -> Result<Vec<ActivityRecord>, CoachError> {
        let mut guard = self.records.write().map_err(|_| CoachError::StorePoisoned)?;
        Ok(std::mem::take(&mut *guard))
    }
}
