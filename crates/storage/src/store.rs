// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job specification store contract.

use bk_core::{BatchJob, Checkpoint, CheckpointEntry, JobId};
use std::sync::Arc;
use thiserror::Error;

/// Errors from job store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no job stored under {0}")]
    NotFound(JobId),
    #[error("job id '{0}' cannot be used as a storage key")]
    InvalidId(JobId),
}

/// Keyed storage for batch job specifications and their recorded progress.
///
/// Every call reads or writes a whole value; callers never observe a partial
/// job. A missing job is `Ok(None)` from [`JobStore::get`], not an error.
pub trait JobStore: Send + Sync + 'static {
    /// Store a job under its id, replacing any previous job and checkpoint.
    fn put(&self, job: &BatchJob) -> Result<(), StoreError>;

    fn get(&self, id: &JobId) -> Result<Option<BatchJob>, StoreError>;

    /// Remove a job and its checkpoint. Returns whether a job was stored.
    fn clear(&self, id: &JobId) -> Result<bool, StoreError>;

    /// Append one target outcome to the job's checkpoint.
    fn record_outcome(&self, id: &JobId, entry: &CheckpointEntry) -> Result<(), StoreError>;

    /// Outcomes recorded since the job was last put.
    fn checkpoint(&self, id: &JobId) -> Result<Checkpoint, StoreError>;
}

impl<T: JobStore> JobStore for Arc<T> {
    fn put(&self, job: &BatchJob) -> Result<(), StoreError> {
        (**self).put(job)
    }

    fn get(&self, id: &JobId) -> Result<Option<BatchJob>, StoreError> {
        (**self).get(id)
    }

    fn clear(&self, id: &JobId) -> Result<bool, StoreError> {
        (**self).clear(id)
    }

    fn record_outcome(&self, id: &JobId, entry: &CheckpointEntry) -> Result<(), StoreError> {
        (**self).record_outcome(id, entry)
    }

    fn checkpoint(&self, id: &JobId) -> Result<Checkpoint, StoreError> {
        (**self).checkpoint(id)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
