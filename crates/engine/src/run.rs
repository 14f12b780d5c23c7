// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient state of one dispatch run. Never persisted.

use bk_core::OperationOutcome;

/// Lifecycle of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunState {
    /// Nothing dispatched yet
    #[default]
    Idle,
    Running,
    /// Every target was attempted
    Completed,
    /// Stopped by its cancellation token; the job stays in the store
    Cancelled,
    /// Could not start: the job-level error that stopped it
    Aborted(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled | RunState::Aborted(_))
    }

    /// Job-level error, kept apart from per-target failures
    pub fn job_error(&self) -> Option<&str> {
        match self {
            RunState::Aborted(reason) => Some(reason),
            _ => None,
        }
    }
}

bk_core::simple_display! {
    RunState {
        Idle => "idle",
        Running => "running",
        Completed => "completed",
        Cancelled => "cancelled",
        Aborted(..) => "aborted",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &OperationOutcome) {
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRun {
    /// Index of the next target to dispatch; `total` once finished
    pub current_index: usize,
    pub total: usize,
    pub stats: RunStats,
    pub state: RunState,
}

impl DispatchRun {
    pub fn new(total: usize) -> Self {
        Self { total, ..Self::default() }
    }

    pub fn aborted(reason: impl Into<String>) -> Self {
        Self { state: RunState::Aborted(reason.into()), ..Self::default() }
    }

    pub fn completed(&self) -> bool {
        self.state == RunState::Completed
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
