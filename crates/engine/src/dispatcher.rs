// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential dispatch loop over the targets of one batch job.

use crate::env::DispatchConfig;
use crate::limiter::{Pause, RateLimiter};
use crate::progress::{ProgressReporter, RunView};
use crate::run::{DispatchRun, RunState};
use crate::tracker::{Tracker, TrackerError};
use bk_adapters::Operation;
use bk_core::{BatchJob, CheckpointEntry, Clock, JobId, OperationOutcome, TargetId};
use bk_storage::{FlightGuard, JobStore, StoreError};
use parking_lot::Mutex;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Error detail recorded on the target that was in flight when a run was cancelled
pub const CANCELLED: &str = "cancelled";

/// Job-level errors: the run could not start or could not go on.
///
/// Per-target failures never show up here; they are recorded on the target.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("job {0} has no targets")]
    NoTargets(JobId),
    #[error("target {0} appears more than once")]
    DuplicateTarget(TargetId),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Final figures of a run that got past validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub job_id: JobId,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Targets restored from the checkpoint instead of being invoked
    pub resumed: usize,
    pub started_at_ms: u64,
    pub finished_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every target was attempted and the job was cleared from the store
    Completed(RunSummary),
    /// Stopped by the cancellation token; the job stays in the store
    Cancelled(RunSummary),
    /// Another run holds the single-flight guard for this job; nothing was done
    AlreadyRunning,
    /// This dispatcher already finished the job; nothing was done
    AlreadyFinished,
    /// This dispatcher is running another job; nothing was done
    Busy(JobId),
}

/// External collaborators of a [`Dispatcher`]
pub struct DispatchDeps<S, O, G> {
    pub store: S,
    pub operation: O,
    pub guard: G,
}

/// Drives one operation call per target, in order, one at a time.
///
/// Owns the only writer of the target tracker. State changes are published
/// to every [`ProgressReporter`] obtained from [`Dispatcher::reporter`].
/// Runs one job at a time, so the published view always belongs to one job.
pub struct Dispatcher<S, O, G, C: Clock> {
    store: S,
    operation: O,
    guard: G,
    clock: C,
    config: DispatchConfig,
    limiter: RateLimiter,
    view_tx: watch::Sender<RunView>,
    active: Mutex<Option<JobId>>,
    /// Jobs completed or rejected by validation in this process
    finished: Mutex<HashSet<JobId>>,
}

/// Claim on the dispatcher's single run slot, released on drop
struct ActiveSlot<'a> {
    slot: &'a Mutex<Option<JobId>>,
}

impl Drop for ActiveSlot<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

impl<S, O, G, C> Dispatcher<S, O, G, C>
where
    S: JobStore,
    O: Operation,
    G: FlightGuard,
    C: Clock,
{
    pub fn new(deps: DispatchDeps<S, O, G>, config: DispatchConfig, clock: C) -> Self {
        let (view_tx, _) = watch::channel(RunView::default());
        Self {
            store: deps.store,
            operation: deps.operation,
            guard: deps.guard,
            clock,
            limiter: RateLimiter::new(config.min_interval),
            config,
            view_tx,
            active: Mutex::new(None),
            finished: Mutex::new(HashSet::new()),
        }
    }

    /// Subscribe to the published run state
    pub fn reporter(&self) -> ProgressReporter {
        ProgressReporter::new(self.view_tx.subscribe())
    }

    /// Run the job stored under `job_id` to completion or cancellation.
    ///
    /// Returns [`DispatchOutcome::AlreadyRunning`], [`DispatchOutcome::Busy`]
    /// or [`DispatchOutcome::AlreadyFinished`] without side effects when the
    /// start is refused. Reporters keep showing whatever they showed before.
    pub async fn dispatch(
        &self,
        job_id: &JobId,
        cancel: CancellationToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        let _slot = match self.claim(job_id) {
            Ok(slot) => slot,
            Err(refused) => return Ok(refused),
        };
        let permit = match self.guard.try_acquire(job_id) {
            Ok(Some(permit)) => permit,
            Ok(None) => {
                tracing::info!(job_id = %job_id, "dispatch already running, start ignored");
                return Ok(DispatchOutcome::AlreadyRunning);
            }
            Err(e) => return Err(self.abort(job_id, e.into())),
        };
        tracing::debug!(?permit, "acquired single-flight guard");

        if self.finished.lock().contains(job_id) {
            tracing::info!(job_id = %job_id, "dispatch already finished, start ignored");
            return Ok(DispatchOutcome::AlreadyFinished);
        }

        let result = match self.load(job_id) {
            Ok(job) => self.run(&job, &cancel).await,
            Err(e) => Err(e),
        };
        if matches!(
            result,
            Ok(DispatchOutcome::Completed(_))
                | Err(DispatchError::NoTargets(_) | DispatchError::DuplicateTarget(_))
        ) {
            self.finished.lock().insert(job_id.clone());
        }
        result.map_err(|e| self.abort(job_id, e))
    }

    /// Take the run slot, or say why the start is refused.
    fn claim(&self, job_id: &JobId) -> Result<ActiveSlot<'_>, DispatchOutcome> {
        let mut active = self.active.lock();
        match active.as_ref() {
            Some(current) if current == job_id => {
                tracing::info!(job_id = %job_id, "dispatch already running, start ignored");
                Err(DispatchOutcome::AlreadyRunning)
            }
            Some(current) => {
                tracing::info!(job_id = %job_id, running = %current, "dispatcher busy, start ignored");
                Err(DispatchOutcome::Busy(current.clone()))
            }
            None => {
                *active = Some(job_id.clone());
                Ok(ActiveSlot { slot: &self.active })
            }
        }
    }

    /// Surface a job-level error to reporters.
    ///
    /// A run of this job that already published keeps its targets; anything
    /// else is replaced by an empty view carrying the error.
    fn abort(&self, job_id: &JobId, error: DispatchError) -> DispatchError {
        tracing::error!(job_id = %job_id, error = %error, "dispatch aborted");
        let reason = error.to_string();
        self.view_tx.send_modify(|view| {
            if view.job_id.as_ref() == Some(job_id) && view.run.state == RunState::Running {
                view.run.state = RunState::Aborted(reason);
            } else {
                *view = RunView {
                    job_id: Some(job_id.clone()),
                    run: DispatchRun::aborted(reason),
                    ..RunView::default()
                };
            }
        });
        error
    }

    /// Read and validate the job. Jobs that can never run are cleared.
    fn load(&self, job_id: &JobId) -> Result<BatchJob, DispatchError> {
        let job = self.store.get(job_id)?.ok_or_else(|| DispatchError::NotFound(job_id.clone()))?;
        let invalid = if job.is_empty() {
            Some(DispatchError::NoTargets(job_id.clone()))
        } else {
            job.duplicate_target().cloned().map(DispatchError::DuplicateTarget)
        };
        match invalid {
            Some(e) => {
                self.clear(job_id);
                Err(e)
            }
            None => Ok(job),
        }
    }

    async fn run(
        &self,
        job: &BatchJob,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        let started_at_ms = self.clock.epoch_ms();
        let mut tracker = Tracker::new(&job.targets)?;
        let mut run = DispatchRun::new(job.len());
        run.state = RunState::Running;

        let resumed = if self.config.resume { self.restore(job, &mut tracker, &mut run)? } else { 0 };
        tracing::info!(
            job_id = %job.id,
            total = job.len(),
            resumed,
            min_interval_ms = self.limiter.min_interval().as_millis() as u64,
            "dispatch started"
        );
        self.publish(&job.id, &tracker, &run);

        let mut invoked = 0usize;
        for (i, target) in job.targets.iter().enumerate() {
            if !tracker.status(target.id.as_str()).is_some_and(|s| s.is_pending()) {
                continue;
            }
            if invoked > 0 && self.limiter.wait(cancel).await == Pause::Cancelled {
                return Ok(self.finish_cancelled(job, &tracker, run, resumed, started_at_ms));
            }
            if cancel.is_cancelled() {
                return Ok(self.finish_cancelled(job, &tracker, run, resumed, started_at_ms));
            }

            run.current_index = i;
            tracker.mark_processing(&target.id)?;
            self.publish(&job.id, &tracker, &run);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.operation.invoke(target, &job.operation_params) => Some(result),
            };
            invoked += 1;

            let Some(result) = result else {
                let outcome = OperationOutcome::failed(CANCELLED);
                tracker.mark_outcome(&target.id, &outcome)?;
                run.stats.record(&outcome);
                return Ok(self.finish_cancelled(job, &tracker, run, resumed, started_at_ms));
            };
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(target_id = %target.id, error = %e, "operation call failed");
                    OperationOutcome::failed(e.to_string())
                }
            };

            let status = tracker.mark_outcome(&target.id, &outcome)?;
            tracing::info!(target_id = %target.id, %status, error = ?status.error_detail(), "target done");
            run.stats.record(&outcome);
            run.current_index = i + 1;
            if self.config.resume {
                let entry = CheckpointEntry::new(target.id.clone(), outcome);
                if let Err(e) = self.store.record_outcome(&job.id, &entry) {
                    tracing::warn!(job_id = %job.id, target_id = %target.id, error = %e, "failed to record checkpoint");
                }
            }
            self.publish(&job.id, &tracker, &run);
        }

        run.current_index = job.len();
        run.state = RunState::Completed;
        self.clear(&job.id);
        self.publish(&job.id, &tracker, &run);

        let summary = self.summary(job, &run, resumed, started_at_ms);
        tracing::info!(
            job_id = %job.id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = summary.finished_at_ms.saturating_sub(started_at_ms),
            "dispatch completed"
        );
        Ok(DispatchOutcome::Completed(summary))
    }

    /// Replay recorded outcomes through the normal transitions.
    fn restore(
        &self,
        job: &BatchJob,
        tracker: &mut Tracker,
        run: &mut DispatchRun,
    ) -> Result<usize, DispatchError> {
        let checkpoint = self.store.checkpoint(&job.id)?;
        if checkpoint.is_empty() {
            return Ok(0);
        }
        let mut resumed = 0;
        for target in &job.targets {
            if let Some(outcome) = checkpoint.outcome_for(target.id.as_str()) {
                tracker.mark_processing(&target.id)?;
                tracker.mark_outcome(&target.id, outcome)?;
                run.stats.record(outcome);
                resumed += 1;
            }
        }
        if resumed < checkpoint.len() {
            tracing::debug!(
                job_id = %job.id,
                entries = checkpoint.len(),
                resumed,
                "checkpoint has entries for unknown or repeated targets"
            );
        }
        Ok(resumed)
    }

    fn finish_cancelled(
        &self,
        job: &BatchJob,
        tracker: &Tracker,
        mut run: DispatchRun,
        resumed: usize,
        started_at_ms: u64,
    ) -> DispatchOutcome {
        run.state = RunState::Cancelled;
        self.publish(&job.id, tracker, &run);
        let summary = self.summary(job, &run, resumed, started_at_ms);
        tracing::info!(
            job_id = %job.id,
            attempted = run.stats.attempted(),
            total = summary.total,
            "dispatch cancelled"
        );
        DispatchOutcome::Cancelled(summary)
    }

    fn summary(
        &self,
        job: &BatchJob,
        run: &DispatchRun,
        resumed: usize,
        started_at_ms: u64,
    ) -> RunSummary {
        RunSummary {
            job_id: job.id.clone(),
            total: job.len(),
            succeeded: run.stats.succeeded,
            failed: run.stats.failed,
            resumed,
            started_at_ms,
            finished_at_ms: self.clock.epoch_ms(),
        }
    }

    fn clear(&self, job_id: &JobId) {
        if let Err(e) = self.store.clear(job_id) {
            tracing::warn!(job_id = %job_id, error = %e, "failed to clear job");
        }
    }

    fn publish(&self, job_id: &JobId, tracker: &Tracker, run: &DispatchRun) {
        self.view_tx.send_modify(|view| {
            view.job_id = Some(job_id.clone());
            view.snapshot = tracker.snapshot();
            view.run = run.clone();
        });
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
