// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory job store.

use crate::store::{JobStore, StoreError};
use bk_core::{BatchJob, Checkpoint, CheckpointEntry, JobId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct StoredJob {
    job: BatchJob,
    checkpoint: Vec<CheckpointEntry>,
}

/// Job store that lives as long as the process. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    inner: Arc<Mutex<HashMap<JobId, StoredJob>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl JobStore for MemoryJobStore {
    fn put(&self, job: &BatchJob) -> Result<(), StoreError> {
        self.inner
            .lock()
            .insert(job.id.clone(), StoredJob { job: job.clone(), checkpoint: Vec::new() });
        Ok(())
    }

    fn get(&self, id: &JobId) -> Result<Option<BatchJob>, StoreError> {
        Ok(self.inner.lock().get(id).map(|stored| stored.job.clone()))
    }

    fn clear(&self, id: &JobId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().remove(id).is_some())
    }

    fn record_outcome(&self, id: &JobId, entry: &CheckpointEntry) -> Result<(), StoreError> {
        let mut jobs = self.inner.lock();
        let stored = jobs.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        stored.checkpoint.push(entry.clone());
        Ok(())
    }

    fn checkpoint(&self, id: &JobId) -> Result<Checkpoint, StoreError> {
        Ok(self
            .inner
            .lock()
            .get(id)
            .map(|stored| stored.checkpoint.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
