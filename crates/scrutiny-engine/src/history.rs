//! Run history
//!
//! Optional append-only record of the most recent N runs, kept for audit
//! and trend purposes. Never load-bearing: disabling it (limit 0) changes
//! nothing about `run`'s behavior.

use crate::types::{RunRecord, RunResult};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Capped in-memory run history
#[derive(Debug)]
pub struct RunHistory {
    limit: usize,
    records: RwLock<VecDeque<RunRecord>>,
}

impl RunHistory {
    /// Create a history keeping at most `limit` records; 0 disables it
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            records: RwLock::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Append a settled run, evicting the oldest record past the cap
    pub fn record(&self, result: &RunResult) {
        if self.limit == 0 {
            return;
        }
        let mut records = self.records.write();
        if records.len() == self.limit {
            records.pop_front();
        }
        records.push_back(RunRecord {
            run_id: result.run_id,
            target: result.summary.target.clone(),
            completed_at: Utc::now(),
            succeeded: result.summary.succeeded,
            failed: result.summary.failed,
        });
    }

    /// Records from oldest to newest
    #[must_use]
    pub fn recent(&self) -> Vec<RunRecord> {
        self.records.read().iter().cloned().collect()
    }

    /// Number of kept records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check whether the history is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
