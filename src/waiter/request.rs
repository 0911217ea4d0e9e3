// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::accessor::{ResolvedFields, TargetRef};
use crate::waiter::backoff::BackoffPolicy;
use std::time::Duration;

/// What to wait for and how patiently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitRequest {
    pub target: TargetRef,
    pub policy: BackoffPolicy,
}

impl WaitRequest {
    pub fn new(target: TargetRef, policy: BackoffPolicy) -> Self {
        Self { target, policy }
    }

    /// Wait for `namespace/name` with the default backoff.
    pub fn for_target(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::new(TargetRef::new(name, namespace), BackoffPolicy::default())
    }
}

/// Produced once per successful wait.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitResult {
    pub target: TargetRef,
    pub resolved_fields: ResolvedFields,
    pub attempts_used: u32,
    pub elapsed: Duration,
}
