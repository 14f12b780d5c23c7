// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress figures handed to the operator-facing view.

use crate::id::TargetId;
use serde::{Deserialize, Serialize};

/// Aggregate progress of a run, recomputed after every target.
///
/// `processed` counts targets that have left `Pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_target_id: Option<TargetId>,
    pub completed: bool,
}

impl Progress {
    /// Percentage of targets processed; `0.0` for an empty job.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
