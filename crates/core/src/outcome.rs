// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result of one operation call for one target.

use crate::target::TargetStatus;
use serde::{Deserialize, Serialize};

/// Detail recorded when an operation reports failure without a message.
pub const UNSPECIFIED_FAILURE: &str = "operation failed";

/// Response shape of the per-target operation: `{ success, error? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn succeeded() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }

    /// Error detail for a failed outcome, defaulted when the operation gave none.
    pub fn error_detail(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            Some(self.error.as_deref().filter(|e| !e.is_empty()).unwrap_or(UNSPECIFIED_FAILURE))
        }
    }

    /// Terminal status this outcome moves a target to.
    pub fn status(&self) -> TargetStatus {
        match self.error_detail() {
            None => TargetStatus::Succeeded,
            Some(error) => TargetStatus::Failed { error: error.to_string() },
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
