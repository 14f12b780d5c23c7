// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress reporting: a read-only projection of what the dispatcher publishes.

use crate::run::{DispatchRun, RunState};
use crate::tracker::TrackerSnapshot;
use bk_core::{JobId, Progress};
use tokio::sync::watch;

/// Everything the dispatcher publishes after a state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunView {
    pub job_id: Option<JobId>,
    pub snapshot: TrackerSnapshot,
    pub run: DispatchRun,
}

impl RunView {
    /// Derive the progress figures for the view boundary.
    pub fn progress(&self) -> Progress {
        Progress {
            processed: self.snapshot.processed(),
            total: self.snapshot.len(),
            succeeded: self.snapshot.succeeded(),
            failed: self.snapshot.failed(),
            current_target_id: self.snapshot.current().cloned(),
            completed: self.run.completed(),
        }
    }
}

/// Read side of a dispatcher's published state.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    rx: watch::Receiver<RunView>,
}

impl ProgressReporter {
    pub(crate) fn new(rx: watch::Receiver<RunView>) -> Self {
        Self { rx }
    }

    /// Latest published view
    pub fn view(&self) -> RunView {
        self.rx.borrow().clone()
    }

    pub fn progress(&self) -> Progress {
        self.rx.borrow().progress()
    }

    pub fn state(&self) -> RunState {
        self.rx.borrow().run.state.clone()
    }

    /// Why the run could not start, if it could not
    pub fn job_error(&self) -> Option<String> {
        self.rx.borrow().run.state.job_error().map(str::to_string)
    }

    pub fn is_terminal(&self) -> bool {
        self.rx.borrow().run.state.is_terminal()
    }

    /// Wait for the next publication. `false` once the dispatcher is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the run reaches a terminal state and return its last view.
    pub async fn wait_terminal(&mut self) -> RunView {
        loop {
            {
                let view = self.rx.borrow_and_update();
                if view.run.state.is_terminal() {
                    return view.clone();
                }
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
