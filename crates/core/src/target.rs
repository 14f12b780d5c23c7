// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Targets of a batch job and their dispatch status.

use crate::id::TargetId;
use serde::{Deserialize, Serialize};

/// Read-only metadata shown next to a target in progress views.
///
/// Never consulted by the dispatch loop itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Phone number or other address the operation delivers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// One recipient of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    #[serde(flatten)]
    pub display: DisplayFields,
}

impl Target {
    pub fn new(id: impl Into<TargetId>) -> Self {
        Self { id: id.into(), display: DisplayFields::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.display.name = Some(name.into());
        self
    }

    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.display.contact = Some(contact.into());
        self
    }
}

/// Dispatch status of a target.
///
/// Transitions are strictly `Pending → Processing → Succeeded | Failed`.
/// The error detail only exists on `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    #[default]
    Pending,
    Processing,
    Succeeded,
    Failed {
        error: String,
    },
}

impl TargetStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, TargetStatus::Pending)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, TargetStatus::Processing)
    }

    /// Succeeded or failed; no further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetStatus::Succeeded | TargetStatus::Failed { .. })
    }

    pub fn error_detail(&self) -> Option<&str> {
        match self {
            TargetStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

crate::simple_display! {
    TargetStatus {
        Pending => "pending",
        Processing => "processing",
        Succeeded => "succeeded",
        Failed { .. } => "failed",
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
