// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight guards: at most one dispatch loop per job id.
//!
//! A guard hands out a [`FlightPermit`] for a job id; further attempts get
//! `None` until the permit is dropped.

use crate::file::file_stem;
use crate::store::StoreError;
use bk_core::JobId;
use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

/// Grants exclusive permission to dispatch a job.
pub trait FlightGuard: Send + Sync + 'static {
    /// `Ok(None)` when another holder already owns the job.
    fn try_acquire(&self, id: &JobId) -> Result<Option<FlightPermit>, StoreError>;
}

impl<T: FlightGuard> FlightGuard for Arc<T> {
    fn try_acquire(&self, id: &JobId) -> Result<Option<FlightPermit>, StoreError> {
        (**self).try_acquire(id)
    }
}

enum Hold {
    Local(Arc<Mutex<HashSet<JobId>>>),
    File(fs::File),
}

/// Proof of holding a job. Released on drop.
pub struct FlightPermit {
    job_id: JobId,
    hold: Hold,
}

impl FlightPermit {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl std::fmt::Debug for FlightPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.hold {
            Hold::Local(_) => "local",
            Hold::File(_) => "file",
        };
        f.debug_struct("FlightPermit").field("job_id", &self.job_id).field("kind", &kind).finish()
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        match &self.hold {
            Hold::Local(held) => {
                held.lock().remove(&self.job_id);
            }
            Hold::File(file) => {
                if let Err(e) = FileExt::unlock(file) {
                    tracing::warn!(job_id = %self.job_id, error = %e, "failed to release job lock");
                }
            }
        }
    }
}

/// Process-local guard. Clones share the set of held jobs.
///
/// Does not see other processes working on the same store; use
/// [`FileFlightGuard`] when several processes share a job directory.
#[derive(Clone, Default)]
pub struct LocalFlightGuard {
    held: Arc<Mutex<HashSet<JobId>>>,
}

impl LocalFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, id: &JobId) -> bool {
        self.held.lock().contains(id)
    }
}

impl FlightGuard for LocalFlightGuard {
    fn try_acquire(&self, id: &JobId) -> Result<Option<FlightPermit>, StoreError> {
        if !self.held.lock().insert(id.clone()) {
            return Ok(None);
        }
        Ok(Some(FlightPermit { job_id: id.clone(), hold: Hold::Local(Arc::clone(&self.held)) }))
    }
}

/// Cross-process guard backed by an advisory lock on `<dir>/<id>.lock`.
///
/// The OS drops the lock if the holder dies, so a crashed run never leaves a
/// job permanently locked.
#[derive(Debug, Clone)]
pub struct FileFlightGuard {
    dir: PathBuf,
}

impl FileFlightGuard {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl FlightGuard for FileFlightGuard {
    fn try_acquire(&self, id: &JobId) -> Result<Option<FlightPermit>, StoreError> {
        let path = self.dir.join(format!("{}.lock", file_stem(id)?));
        let file = OpenOptions::new().write(true).create(true).truncate(false).open(&path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FlightPermit { job_id: id.clone(), hold: Hold::File(file) })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
