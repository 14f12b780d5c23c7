// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the specs.

pub use bk_adapters::FakeOperation;
pub use bk_core::test_support::{job_with_targets, target_id};
pub use bk_core::{
    BatchJob, CheckpointEntry, JobId, OperationOutcome, SystemClock, Target, TargetId,
    TargetStatus,
};
pub use bk_engine::{
    DispatchConfig, DispatchDeps, DispatchError, DispatchOutcome, Dispatcher, RunState, RunSummary,
};
pub use bk_storage::{FileFlightGuard, FileJobStore, JobStore};
pub use std::time::Duration;
pub use tempfile::TempDir;
pub use tokio_util::sync::CancellationToken;

pub type FileDispatcher = Dispatcher<FileJobStore, FakeOperation, FileFlightGuard, SystemClock>;

/// A state directory shared by every dispatcher opened on it, like several
/// processes pointed at the same `BK_STATE_DIR`.
pub struct StateDir {
    dir: TempDir,
}

impl StateDir {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn store(&self) -> FileJobStore {
        FileJobStore::open(self.dir.path().join("jobs")).unwrap()
    }

    pub fn guard(&self) -> FileFlightGuard {
        FileFlightGuard::open(self.dir.path().join("locks")).unwrap()
    }

    pub fn job_file(&self, id: &str) -> std::path::PathBuf {
        self.dir.path().join("jobs").join(format!("{id}.job.json"))
    }

    pub fn progress_file(&self, id: &str) -> std::path::PathBuf {
        self.dir.path().join("jobs").join(format!("{id}.progress.jsonl"))
    }

    /// A fresh dispatcher over this directory, as a newly started process would build.
    pub fn dispatcher(&self, operation: FakeOperation, config: DispatchConfig) -> FileDispatcher {
        let deps = DispatchDeps { store: self.store(), operation, guard: self.guard() };
        Dispatcher::new(deps, config, SystemClock)
    }
}

/// Dispatch config without the inter-call pause.
pub fn unthrottled() -> DispatchConfig {
    DispatchConfig::default().min_interval(Duration::ZERO)
}

pub fn expect_completed(outcome: DispatchOutcome) -> RunSummary {
    match outcome {
        DispatchOutcome::Completed(summary) => summary,
        other => panic!("expected completed run, got {other:?}"),
    }
}

pub fn expect_cancelled(outcome: DispatchOutcome) -> RunSummary {
    match outcome {
        DispatchOutcome::Cancelled(summary) => summary,
        other => panic!("expected cancelled run, got {other:?}"),
    }
}

pub fn ids(names: &[&str]) -> Vec<TargetId> {
    names.iter().copied().map(TargetId::from).collect()
}
