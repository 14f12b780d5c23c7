// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BatchJob, JobId};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core dispatch types.
pub mod strategies {
    use crate::outcome::OperationOutcome;
    use crate::target::TargetStatus;
    use proptest::prelude::*;

    pub fn arb_target_status() -> impl Strategy<Value = TargetStatus> {
        prop_oneof![
            Just(TargetStatus::Pending),
            Just(TargetStatus::Processing),
            Just(TargetStatus::Succeeded),
            ".{0,16}".prop_map(|error| TargetStatus::Failed { error }),
        ]
    }

    pub fn arb_outcome() -> impl Strategy<Value = OperationOutcome> {
        prop_oneof![
            Just(OperationOutcome::succeeded()),
            "[a-z ]{1,16}".prop_map(OperationOutcome::failed),
        ]
    }

    /// One scripted outcome per target, for jobs of up to `max` targets.
    pub fn arb_outcome_script(max: usize) -> impl Strategy<Value = Vec<OperationOutcome>> {
        proptest::collection::vec(arb_outcome(), 0..=max)
    }
}

// ── Job factories ───────────────────────────────────────────────────────

/// Id of the `index`-th target produced by [`job_with_targets`].
pub fn target_id(index: usize) -> String {
    format!("c-{index}")
}

/// A job with `n` targets named `c-0 .. c-{n-1}`.
pub fn job_with_targets(id: &str, n: usize) -> BatchJob {
    BatchJob::builder().id(JobId::from(id)).target_ids((0..n).map(target_id)).build()
}
