// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch job description: the ordered targets plus shared operation parameters.

use crate::clock::Clock;
use crate::id::{JobId, TargetId};
use crate::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Opaque payload forwarded to the operation for every target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationParams(pub Value);

impl OperationParams {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for OperationParams {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl From<Value> for OperationParams {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Delivery channel of a promotional message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    Sms,
    Whatsapp,
}

crate::simple_display! {
    MessageChannel {
        Sms => "sms",
        Whatsapp => "whatsapp",
    }
}

/// Parameters of a campaign send: one message body for every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParams {
    pub channel: MessageChannel,
    pub body: String,
}

impl From<MessageParams> for OperationParams {
    fn from(params: MessageParams) -> Self {
        Self(json!({
            "kind": "message",
            "channel": params.channel.to_string(),
            "body": params.body,
        }))
    }
}

/// Parameters of a bulk credential reset.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialResetParams {
    pub credential: String,
}

impl std::fmt::Debug for CredentialResetParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResetParams").field("credential", &"<redacted>").finish()
    }
}

impl From<CredentialResetParams> for OperationParams {
    fn from(params: CredentialResetParams) -> Self {
        Self(json!({
            "kind": "credential_reset",
            "credential": params.credential,
        }))
    }
}

/// The unit of work handed to the dispatcher.
///
/// Written once to the job store before dispatch starts and never mutated.
/// `targets` order is the dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub id: JobId,
    pub targets: Vec<Target>,
    #[serde(default)]
    pub operation_params: OperationParams,
    /// Diagnostics only
    #[serde(default)]
    pub created_at_ms: u64,
}

impl BatchJob {
    pub fn new(
        id: impl Into<JobId>,
        targets: Vec<Target>,
        operation_params: impl Into<OperationParams>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: id.into(),
            targets,
            operation_params: operation_params.into(),
            created_at_ms: clock.epoch_ms(),
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// First target id that appears more than once, if any.
    pub fn duplicate_target(&self) -> Option<&TargetId> {
        let mut seen = HashSet::with_capacity(self.targets.len());
        self.targets.iter().map(|t| &t.id).find(|id| !seen.insert(*id))
    }
}

crate::builder! {
    pub struct BatchJobBuilder => BatchJob {
        into {
            id: JobId = "job-test",
            operation_params: OperationParams = OperationParams::default(),
        }
        set {
            targets: Vec<Target> = Vec::new(),
            created_at_ms: u64 = 1_000_000,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl BatchJobBuilder {
    /// Targets with the given ids and no display fields, in order.
    pub fn target_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TargetId>,
    {
        self.targets(ids.into_iter().map(Target::new).collect())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
