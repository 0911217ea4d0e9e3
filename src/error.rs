// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

/// Failures of the crate's own Kubernetes operations (namespace, bucket claim, values).
#[derive(Error, Debug)]
pub enum CredwaitError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("CRD not installed: {0}")]
    CrdNotInstalled(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Failed to render values: {0}")]
    RenderError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CredwaitError>;

/// A lookup failure that is not the "object not present" signal.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Control plane unavailable: {0}")]
    Unavailable(String),
}

/// Terminal failures of a single wait.
#[derive(Error, Debug)]
pub enum WaitError {
    #[error("Invalid wait configuration: {0}")]
    Configuration(String),

    #[error("Timed out waiting for {namespace}/{name} after {attempts} attempts ({elapsed:?})")]
    Timeout {
        name: String,
        namespace: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Lookup of {namespace}/{name} failed on attempt {attempt} ({elapsed:?}): {source}")]
    Fatal {
        name: String,
        namespace: String,
        attempt: u32,
        elapsed: Duration,
        #[source]
        source: LookupError,
    },

    #[error("Wait for {namespace}/{name} cancelled after {attempts} attempts ({elapsed:?})")]
    Cancelled {
        name: String,
        namespace: String,
        attempts: u32,
        elapsed: Duration,
    },
}

impl WaitError {
    /// Number of lookups issued before the wait ended.
    pub fn attempts(&self) -> u32 {
        match self {
            WaitError::Configuration(_) => 0,
            WaitError::Timeout { attempts, .. } | WaitError::Cancelled { attempts, .. } => *attempts,
            WaitError::Fatal { attempt, .. } => *attempt,
        }
    }
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node '{0}' is already registered")]
    DuplicateNode(String),

    #[error("Node '{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },

    #[error("Input '{input}' is not available or has the wrong shape")]
    MissingInput { input: String },

    #[error("Node '{node}' failed: {source:#}")]
    NodeFailed {
        node: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Graph evaluation cancelled")]
    Cancelled,
}
