// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-core: data model for bulk dispatch jobs

pub mod macros;

pub mod checkpoint;
pub mod clock;
pub mod id;
pub mod job;
pub mod outcome;
pub mod progress;
pub mod target;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use checkpoint::{Checkpoint, CheckpointEntry};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, JobId, TargetId};
#[cfg(any(test, feature = "test-support"))]
pub use job::BatchJobBuilder;
pub use job::{BatchJob, CredentialResetParams, MessageChannel, MessageParams, OperationParams};
pub use outcome::{OperationOutcome, UNSPECIFIED_FAILURE};
pub use progress::Progress;
pub use target::{DisplayFields, Target, TargetStatus};
