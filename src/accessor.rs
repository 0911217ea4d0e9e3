// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Point lookups against the control plane.

use crate::error::LookupError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt;

/// Payload of a resolved object, field name to raw value. Never interpreted here.
pub type ResolvedFields = BTreeMap<String, Bytes>;

/// Identity of the object being awaited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetRef {
    pub name: String,
    pub namespace: String,
}

impl TargetRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Outcome of a lookup that reached the control plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(ResolvedFields),
    /// The object does not exist (yet). The only retryable outcome.
    NotFound,
}

#[async_trait]
pub trait ControlPlaneAccessor: Send + Sync {
    /// Fetch the current state of `target`.
    ///
    /// Absence must be reported as `Ok(Lookup::NotFound)`; any `Err` is treated
    /// as permanent by the waiter.
    async fn lookup(&self, target: &TargetRef) -> Result<Lookup, LookupError>;
}
