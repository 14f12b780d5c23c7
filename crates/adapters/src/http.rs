// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation backed by an HTTP endpoint of the messaging or identity provider.
//!
//! Request, one per target:
//!
//! ```text
//! POST <endpoint>
//! { "targetId": "...", "display": { "name": "...", "contact": "..." }, "operationParams": { ... } }
//! ```
//!
//! Response: `{ "success": bool, "error"?: string }`.

use crate::operation::{Operation, OperationError};
use async_trait::async_trait;
use bk_core::{DisplayFields, OperationOutcome, OperationParams, Target, TargetId};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Longest response body kept in a `Status` error
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct HttpOperationConfig {
    pub endpoint: String,
    pub bearer_token: Option<String>,
    /// Per-request deadline enforced by the HTTP client
    pub timeout: Duration,
}

impl HttpOperationConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), bearer_token: None, timeout: Duration::from_secs(30) }
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    bk_core::setters! {
        set { timeout: Duration }
    }
}

impl std::fmt::Debug for HttpOperationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpOperationConfig")
            .field("endpoint", &self.endpoint)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationRequest<'a> {
    target_id: &'a TargetId,
    display: &'a DisplayFields,
    operation_params: &'a OperationParams,
}

#[derive(Debug, Clone)]
pub struct HttpOperation {
    client: Client,
    config: HttpOperationConfig,
}

impl HttpOperation {
    pub fn new(config: HttpOperationConfig) -> Result<Self, OperationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OperationError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpOperationConfig {
        &self.config
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    bk_core::short(text.trim(), MAX_ERROR_BODY).to_string()
}

#[async_trait]
impl Operation for HttpOperation {
    async fn invoke(
        &self,
        target: &Target,
        params: &OperationParams,
    ) -> Result<OperationOutcome, OperationError> {
        let body = OperationRequest {
            target_id: &target.id,
            display: &target.display,
            operation_params: params,
        };
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response =
            request.send().await.map_err(|e| OperationError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| OperationError::Transport(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&bytes)
                .map_err(|e| OperationError::InvalidResponse(e.to_string()));
        }

        // Providers reject bad recipients with 4xx plus a regular failure body
        match serde_json::from_slice::<OperationOutcome>(&bytes) {
            Ok(outcome) if !outcome.success => {
                tracing::debug!(target_id = %target.id, status = status.as_u16(), "provider rejected target");
                Ok(outcome)
            }
            _ => Err(OperationError::Status { status: status.as_u16(), body: truncate_body(&bytes) }),
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
