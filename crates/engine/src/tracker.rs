// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target state tracker: the record of what has happened to each target.
//!
//! Owned by exactly one dispatch loop, which is its only writer. Everyone
//! else reads immutable [`TrackerSnapshot`]s.

use bk_core::{OperationOutcome, Target, TargetId, TargetStatus};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Misuse of the tracker's state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("target {0} appears more than once")]
    DuplicateTarget(TargetId),
    #[error("unknown target {0}")]
    UnknownTarget(TargetId),
    #[error("target {id} is {from}, expected {expected}")]
    InvalidTransition { id: TargetId, from: TargetStatus, expected: &'static str },
    #[error("target {requested} cannot start while {active} is processing")]
    AlreadyProcessing { requested: TargetId, active: TargetId },
}

/// A target together with its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetState {
    pub target: Target,
    pub status: TargetStatus,
}

impl TargetState {
    pub fn id(&self) -> &TargetId {
        &self.target.id
    }
}

#[derive(Debug)]
pub struct Tracker {
    entries: Vec<TargetState>,
    index: HashMap<TargetId, usize>,
    processing: Option<usize>,
}

impl Tracker {
    /// Start every target in `Pending`, keeping the given order.
    pub fn new(targets: &[Target]) -> Result<Self, TrackerError> {
        let mut index = HashMap::with_capacity(targets.len());
        for (i, target) in targets.iter().enumerate() {
            if index.insert(target.id.clone(), i).is_some() {
                return Err(TrackerError::DuplicateTarget(target.id.clone()));
            }
        }
        let entries = targets
            .iter()
            .map(|target| TargetState { target: target.clone(), status: TargetStatus::Pending })
            .collect();
        Ok(Self { entries, index, processing: None })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self, id: &str) -> Option<&TargetStatus> {
        self.index.get(id).map(|&i| &self.entries[i].status)
    }

    fn position(&self, id: &TargetId) -> Result<usize, TrackerError> {
        self.index.get(id).copied().ok_or_else(|| TrackerError::UnknownTarget(id.clone()))
    }

    /// `Pending → Processing`. Only one target may be processing at a time.
    pub fn mark_processing(&mut self, id: &TargetId) -> Result<(), TrackerError> {
        let i = self.position(id)?;
        if let Some(active) = self.processing {
            return Err(TrackerError::AlreadyProcessing {
                requested: id.clone(),
                active: self.entries[active].target.id.clone(),
            });
        }
        let entry = &mut self.entries[i];
        if !entry.status.is_pending() {
            return Err(TrackerError::InvalidTransition {
                id: id.clone(),
                from: entry.status.clone(),
                expected: "pending",
            });
        }
        entry.status = TargetStatus::Processing;
        self.processing = Some(i);
        Ok(())
    }

    /// `Processing → Succeeded | Failed`, as reported by `outcome`.
    pub fn mark_outcome(
        &mut self,
        id: &TargetId,
        outcome: &OperationOutcome,
    ) -> Result<&TargetStatus, TrackerError> {
        let i = self.position(id)?;
        let entry = &mut self.entries[i];
        if !entry.status.is_processing() {
            return Err(TrackerError::InvalidTransition {
                id: id.clone(),
                from: entry.status.clone(),
                expected: "processing",
            });
        }
        entry.status = outcome.status();
        self.processing = None;
        Ok(&entry.status)
    }

    /// Immutable copy of every target and its status.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot { targets: self.entries.iter().cloned().collect() }
    }
}

/// Point-in-time copy of the tracker, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSnapshot {
    targets: Arc<[TargetState]>,
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        Self { targets: Arc::from(Vec::new()) }
    }
}

impl TrackerSnapshot {
    pub fn targets(&self) -> &[TargetState] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TargetState> {
        self.targets.iter().find(|t| t.target.id == id)
    }

    fn count(&self, pred: impl Fn(&TargetStatus) -> bool) -> usize {
        self.targets.iter().filter(|t| pred(&t.status)).count()
    }

    pub fn pending(&self) -> usize {
        self.count(TargetStatus::is_pending)
    }

    /// Targets that have left `Pending`
    pub fn processed(&self) -> usize {
        self.len() - self.pending()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Failed { .. }))
    }

    /// The target currently being processed, if any
    pub fn current(&self) -> Option<&TargetId> {
        self.targets.iter().find(|t| t.status.is_processing()).map(TargetState::id)
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
