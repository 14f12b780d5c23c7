// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Bulk dispatch engine: runs one operation per target of a stored job

mod dispatcher;
pub mod env;
mod limiter;
mod progress;
mod run;
mod tracker;

pub use dispatcher::{
    DispatchDeps, DispatchError, DispatchOutcome, Dispatcher, RunSummary, CANCELLED,
};
pub use env::{DispatchConfig, EnvError, DEFAULT_MIN_INTERVAL};
pub use limiter::{Pause, RateLimiter};
pub use progress::{ProgressReporter, RunView};
pub use run::{DispatchRun, RunState, RunStats};
pub use tracker::{TargetState, Tracker, TrackerError, TrackerSnapshot};
