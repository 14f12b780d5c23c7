// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed job store.
//!
//! Layout per job id:
//!
//! ```text
//! <dir>/<id>.job.json        whole BatchJob, replaced atomically
//! <dir>/<id>.progress.jsonl  one CheckpointEntry per line, append-only
//! ```

use crate::store::{JobStore, StoreError};
use bk_core::{BatchJob, Checkpoint, CheckpointEntry, JobId};
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Job store keeping one file pair per job in a directory.
///
/// Survives process restarts, and several processes may share the directory.
#[derive(Debug, Clone)]
pub struct FileJobStore {
    dir: PathBuf,
}

impl FileJobStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn job_path(&self, id: &JobId) -> Result<PathBuf, StoreError> {
        Ok(self.dir.join(format!("{}.job.json", file_stem(id)?)))
    }

    fn progress_path(&self, id: &JobId) -> Result<PathBuf, StoreError> {
        Ok(self.dir.join(format!("{}.progress.jsonl", file_stem(id)?)))
    }
}

/// Job ids become file names, so they must not be able to escape the directory.
pub(crate) fn file_stem(id: &JobId) -> Result<&str, StoreError> {
    let s = id.as_str();
    let valid = !s.is_empty()
        && !s.starts_with('.')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(s)
    } else {
        Err(StoreError::InvalidId(id.clone()))
    }
}

fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Cut a partial last line left by a crash mid-append, so the next entry
/// starts on a line of its own. Returns the number of bytes dropped.
fn trim_torn_tail(file: &mut fs::File) -> io::Result<u64> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(0);
    }

    let mut bytes = Vec::with_capacity(len as usize);
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut bytes)?;
    let keep = bytes.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1) as u64;
    file.set_len(keep)?;
    Ok(len - keep)
}

impl JobStore for FileJobStore {
    fn put(&self, job: &BatchJob) -> Result<(), StoreError> {
        let path = self.job_path(&job.id)?;
        let bytes = serde_json::to_vec_pretty(job)?;

        // Old progress belongs to the previous job under this id
        remove_if_exists(&self.progress_path(&job.id)?)?;

        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        tracing::debug!(job_id = %job.id, targets = job.len(), "stored job");
        Ok(())
    }

    fn get(&self, id: &JobId) -> Result<Option<BatchJob>, StoreError> {
        match fs::read(self.job_path(id)?) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self, id: &JobId) -> Result<bool, StoreError> {
        let existed = remove_if_exists(&self.job_path(id)?)?;
        remove_if_exists(&self.progress_path(id)?)?;
        Ok(existed)
    }

    fn record_outcome(&self, id: &JobId, entry: &CheckpointEntry) -> Result<(), StoreError> {
        if !self.job_path(id)?.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let path = self.progress_path(id)?;
        let mut file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
        let dropped = trim_torn_tail(&mut file)?;
        if dropped > 0 {
            tracing::warn!(
                job_id = %id,
                path = %path.display(),
                dropped,
                "discarded torn checkpoint tail before append"
            );
        }
        file.write_all(&line)?;
        file.sync_data()?;
        Ok(())
    }

    fn checkpoint(&self, id: &JobId) -> Result<Checkpoint, StoreError> {
        let path = self.progress_path(id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Checkpoint::default()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (line_no, line) in bytes.split(|b| *b == b'\n').enumerate() {
            if line.is_empty() {
                continue;
            }
            match serde_json::from_slice::<CheckpointEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // A crash mid-append leaves a torn last line; keep what precedes it
                    tracing::warn!(
                        job_id = %id,
                        path = %path.display(),
                        line = line_no + 1,
                        error = %e,
                        "stopping checkpoint read at corrupt entry"
                    );
                    break;
                }
            }
        }
        Ok(Checkpoint { entries })
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
