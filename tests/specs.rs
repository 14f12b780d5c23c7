// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level behavioral specs for bulk dispatch.
//!
//! Each spec wires a real `FileJobStore` and `FileFlightGuard` in a temp
//! directory to the dispatcher, with a scripted fake operation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/dispatch/mod.rs"]
mod dispatch;
