// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the per-target operations a dispatcher drives

pub mod http;
pub mod operation;

pub use http::{HttpOperation, HttpOperationConfig};
pub use operation::{Operation, OperationError};

#[cfg(any(test, feature = "test-support"))]
pub use operation::{FakeOperation, OperationCall};
