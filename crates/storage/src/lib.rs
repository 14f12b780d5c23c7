// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Job specification storage and single-flight guards

mod file;
mod guard;
mod memory;
mod store;

pub use file::FileJobStore;
pub use guard::{FileFlightGuard, FlightGuard, FlightPermit, LocalFlightGuard};
pub use memory::MemoryJobStore;
pub use store::{JobStore, StoreError};
