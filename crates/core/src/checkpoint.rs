// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target outcomes recorded while a job runs, so a restarted run can
//! skip targets that were already attempted.

use crate::id::TargetId;
use crate::outcome::OperationOutcome;
use serde::{Deserialize, Serialize};

/// One recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointEntry {
    pub target_id: TargetId,
    #[serde(flatten)]
    pub outcome: OperationOutcome,
}

impl CheckpointEntry {
    pub fn new(target_id: impl Into<TargetId>, outcome: OperationOutcome) -> Self {
        Self { target_id: target_id.into(), outcome }
    }
}

/// Outcomes recorded for a job, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub entries: Vec<CheckpointEntry>,
}

impl Checkpoint {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Latest outcome recorded for a target.
    pub fn outcome_for(&self, target_id: &str) -> Option<&OperationOutcome> {
        self.entries.iter().rev().find(|e| e.target_id == target_id).map(|e| &e.outcome)
    }
}

impl FromIterator<CheckpointEntry> for Checkpoint {
    fn from_iter<I: IntoIterator<Item = CheckpointEntry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
