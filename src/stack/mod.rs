// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The declared deployment: namespace, bucket claim, bucket credentials and registry values.

pub mod registry;
pub mod resources;

use crate::accessor::TargetRef;
use crate::config::Config;
use crate::constants::nodes;
use crate::error::GraphError;
use crate::graph::{Graph, WaitNode};
use crate::kubernetes::SecretAccessor;
use crate::types::ObjectBucketClaim;
use crate::waiter::{WaitRequest, Waiter};
use kube::Client;
use std::sync::Arc;

pub use registry::{registry_values, render_values_yaml, RegistryStorage, RegistryValuesNode};
pub use resources::{BucketClaimNode, NamespaceNode};

/// Build the deployment graph.
///
/// The credentials node depends on the bucket claim, so polling for the
/// provisioner's secret only starts once the claim has been applied.
pub fn build_graph(client: Client, config: &Config) -> Result<Graph, GraphError> {
    let namespace = &config.deployment_namespace;
    let claim = ObjectBucketClaim::for_bucket(
        &config.bucket_claim_name,
        namespace,
        &config.bucket_name,
        &config.bucket_storage_class,
    );
    let credentials = WaitRequest::new(
        TargetRef::new(claim.credentials_secret_name(), namespace.as_str()),
        config.wait_policy,
    );
    let waiter = Arc::new(Waiter::new(SecretAccessor::new(client.clone())));

    let mut graph = Graph::new();
    graph.add_node(nodes::NAMESPACE, NamespaceNode::new(client.clone(), namespace), &[])?;
    graph.add_node(
        nodes::BUCKET_CLAIM,
        BucketClaimNode::new(client, claim),
        &[nodes::NAMESPACE],
    )?;
    graph.add_node(
        nodes::BUCKET_CREDENTIALS,
        WaitNode::new(waiter, credentials),
        &[nodes::BUCKET_CLAIM],
    )?;
    graph.add_node(
        nodes::REGISTRY_VALUES,
        RegistryValuesNode::new(
            RegistryStorage {
                bucket: config.bucket_name.clone(),
                endpoint: config.bucket_endpoint.clone(),
                region: config.bucket_region.clone(),
            },
            nodes::BUCKET_CREDENTIALS,
        ),
        &[nodes::BUCKET_CREDENTIALS],
    )?;

    Ok(graph)
}
