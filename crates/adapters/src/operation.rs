// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use bk_core::{OperationOutcome, OperationParams, Target};
use thiserror::Error;

/// Failures below the operation's own success/failure report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// One side-effecting call per target (send a message, reset a credential).
///
/// `Ok` carries the provider's verdict, which may itself be a failure such as
/// "invalid number". `Err` means no verdict was obtained.
#[async_trait]
pub trait Operation: Clone + Send + Sync + 'static {
    async fn invoke(
        &self,
        target: &Target,
        params: &OperationParams,
    ) -> Result<OperationOutcome, OperationError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{Operation, OperationError};
    use async_trait::async_trait;
    use bk_core::{OperationOutcome, OperationParams, Target, TargetId};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Recorded invocation
    #[derive(Debug, Clone)]
    pub struct OperationCall {
        pub target_id: TargetId,
        pub params: OperationParams,
        /// Tokio time at which the call started (respects paused test time)
        pub started_at: Instant,
    }

    #[derive(Default)]
    struct FakeOperationState {
        calls: Vec<OperationCall>,
        scripted: HashMap<TargetId, Result<OperationOutcome, OperationError>>,
        latency: Duration,
    }

    /// Fake operation for testing.
    ///
    /// Succeeds for every target unless a result was scripted for it.
    #[derive(Clone, Default)]
    pub struct FakeOperation {
        inner: Arc<Mutex<FakeOperationState>>,
    }

    impl FakeOperation {
        pub fn new() -> Self {
            Self::default()
        }

        /// Report a business failure for `target`.
        pub fn fail(self, target: impl Into<TargetId>, error: &str) -> Self {
            self.inner.lock().scripted.insert(target.into(), Ok(OperationOutcome::failed(error)));
            self
        }

        /// Fail the call itself for `target`, as a dropped connection would.
        pub fn transport_error(self, target: impl Into<TargetId>, error: &str) -> Self {
            self.inner
                .lock()
                .scripted
                .insert(target.into(), Err(OperationError::Transport(error.to_string())));
            self
        }

        /// Delay every call by `latency` before answering.
        pub fn with_latency(self, latency: Duration) -> Self {
            self.inner.lock().latency = latency;
            self
        }

        pub fn calls(&self) -> Vec<OperationCall> {
            self.inner.lock().calls.clone()
        }

        /// Target ids in the order they were invoked
        pub fn call_order(&self) -> Vec<TargetId> {
            self.inner.lock().calls.iter().map(|c| c.target_id.clone()).collect()
        }
    }

    #[async_trait]
    impl Operation for FakeOperation {
        async fn invoke(
            &self,
            target: &Target,
            params: &OperationParams,
        ) -> Result<OperationOutcome, OperationError> {
            let (latency, result) = {
                let mut state = self.inner.lock();
                state.calls.push(OperationCall {
                    target_id: target.id.clone(),
                    params: params.clone(),
                    started_at: Instant::now(),
                });
                let result = state
                    .scripted
                    .get(&target.id)
                    .cloned()
                    .unwrap_or_else(|| Ok(OperationOutcome::succeeded()));
                (state.latency, result)
            };
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOperation, OperationCall};

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
