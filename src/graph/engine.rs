// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Dependency-ordered evaluation of deployment nodes.

use crate::error::GraphError;
use crate::graph::node::{Inputs, Node, NodeOutput};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

struct Entry {
    dependencies: Vec<String>,
    node: Arc<dyn Node>,
}

/// A directed acyclic graph of nodes.
///
/// Dependencies must be registered before their dependents, which rules out
/// cycles at construction time.
#[derive(Default)]
pub struct Graph {
    entries: BTreeMap<String, Entry>,
    order: Vec<String>,
}

/// Outputs of every node of a successful evaluation
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    outputs: BTreeMap<String, Arc<NodeOutput>>,
}

impl Evaluation {
    pub fn get(&self, id: &str) -> Option<&NodeOutput> {
        self.outputs.get(id).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

type Running = BoxFuture<'static, (String, anyhow::Result<NodeOutput>)>;

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        id: &str,
        node: impl Node + 'static,
        dependencies: &[&str],
    ) -> Result<(), GraphError> {
        if self.entries.contains_key(id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        if let Some(missing) = dependencies
            .iter()
            .find(|dep| !self.entries.contains_key(**dep))
        {
            return Err(GraphError::UnknownDependency {
                node: id.to_string(),
                dependency: missing.to_string(),
            });
        }

        self.entries.insert(
            id.to_string(),
            Entry {
                dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
                node: Arc::new(node),
            },
        );
        self.order.push(id.to_string());
        Ok(())
    }

    pub fn dependencies(&self, id: &str) -> Option<&[String]> {
        self.entries.get(id).map(|e| e.dependencies.as_slice())
    }

    /// Node ids in registration order, which is a valid topological order
    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    /// Evaluate every node once, each as soon as its dependencies have succeeded.
    ///
    /// Independent nodes run concurrently. The first failure stops the
    /// evaluation and drops the nodes still running.
    #[instrument(skip(self, cancel), fields(nodes = self.order.len()))]
    pub async fn evaluate(&self, cancel: &CancellationToken) -> Result<Evaluation, GraphError> {
        let mut outputs: BTreeMap<String, Arc<NodeOutput>> = BTreeMap::new();
        let mut started: BTreeSet<String> = BTreeSet::new();
        let mut running: FuturesUnordered<Running> = FuturesUnordered::new();

        self.start_ready(&outputs, &mut started, &mut running, cancel);

        while !running.is_empty() {
            let (id, result) = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Graph evaluation cancelled with {} nodes running", running.len());
                    return Err(GraphError::Cancelled);
                }
                Some(done) = running.next() => done,
            };

            match result {
                Ok(output) => {
                    info!("Node '{}' completed", id);
                    outputs.insert(id, Arc::new(output));
                    self.start_ready(&outputs, &mut started, &mut running, cancel);
                }
                Err(source) => {
                    error!("Node '{}' failed: {:#}", id, source);
                    return Err(GraphError::NodeFailed { node: id, source });
                }
            }
        }

        info!("Graph evaluation complete, {} nodes resolved", outputs.len());
        Ok(Evaluation { outputs })
    }

    fn start_ready(
        &self,
        outputs: &BTreeMap<String, Arc<NodeOutput>>,
        started: &mut BTreeSet<String>,
        running: &mut FuturesUnordered<Running>,
        cancel: &CancellationToken,
    ) {
        for id in &self.order {
            let entry = &self.entries[id];
            if started.contains(id)
                || !entry.dependencies.iter().all(|d| outputs.contains_key(d))
            {
                continue;
            }

            debug!("Starting node '{}'", id);
            started.insert(id.clone());

            let inputs = Inputs::new(
                entry
                    .dependencies
                    .iter()
                    .map(|d| (d.clone(), outputs[d].clone()))
                    .collect(),
            );
            let node = entry.node.clone();
            let token = cancel.child_token();
            let id = id.clone();
            running.push(
                async move {
                    let result = node.evaluate(&inputs, &token).await;
                    (id, result)
                }
                .boxed(),
            );
        }
    }
}
