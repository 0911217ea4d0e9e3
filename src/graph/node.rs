// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::accessor::{ControlPlaneAccessor, ResolvedFields};
use crate::error::GraphError;
use crate::waiter::{WaitRequest, Waiter};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Value produced by a node and handed to its downstream nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Unit,
    Fields(ResolvedFields),
    Value(serde_json::Value),
}

/// Outputs of a node's upstream dependencies, keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    outputs: BTreeMap<String, Arc<NodeOutput>>,
}

impl Inputs {
    pub(crate) fn new(outputs: BTreeMap<String, Arc<NodeOutput>>) -> Self {
        Self { outputs }
    }

    pub fn get(&self, id: &str) -> Option<&NodeOutput> {
        self.outputs.get(id).map(Arc::as_ref)
    }

    pub fn fields(&self, id: &str) -> Result<&ResolvedFields, GraphError> {
        match self.get(id) {
            Some(NodeOutput::Fields(fields)) => Ok(fields),
            _ => Err(GraphError::MissingInput {
                input: id.to_string(),
            }),
        }
    }

    pub fn value(&self, id: &str) -> Result<&serde_json::Value, GraphError> {
        match self.get(id) {
            Some(NodeOutput::Value(value)) => Ok(value),
            _ => Err(GraphError::MissingInput {
                input: id.to_string(),
            }),
        }
    }
}

/// A unit of deployment evaluation.
#[async_trait]
pub trait Node: Send + Sync {
    async fn evaluate(
        &self,
        inputs: &Inputs,
        cancel: &CancellationToken,
    ) -> anyhow::Result<NodeOutput>;
}

/// Blocks its downstream nodes until the awaited object exists, then exposes its fields.
pub struct WaitNode<A> {
    waiter: Arc<Waiter<A>>,
    request: WaitRequest,
}

impl<A> WaitNode<A> {
    pub fn new(waiter: Arc<Waiter<A>>, request: WaitRequest) -> Self {
        Self { waiter, request }
    }
}

#[async_trait]
impl<A: ControlPlaneAccessor + 'static> Node for WaitNode<A> {
    async fn evaluate(
        &self,
        _inputs: &Inputs,
        cancel: &CancellationToken,
    ) -> anyhow::Result<NodeOutput> {
        let result = self.waiter.wait_with_cancel(&self.request, cancel).await?;
        Ok(NodeOutput::Fields(result.resolved_fields))
    }
}
