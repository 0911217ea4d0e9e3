// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Graph nodes creating cluster resources

use crate::error::CredwaitError;
use crate::graph::{Inputs, Node, NodeOutput};
use crate::kubernetes::{apply_bucket_claim, apply_namespace, bucket_claim_crd_installed};
use crate::types::ObjectBucketClaim;
use async_trait::async_trait;
use kube::{Client, ResourceExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct NamespaceNode {
    client: Client,
    name: String,
}

impl NamespaceNode {
    pub fn new(client: Client, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Node for NamespaceNode {
    async fn evaluate(
        &self,
        _inputs: &Inputs,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<NodeOutput> {
        apply_namespace(&self.client, &self.name).await?;
        Ok(NodeOutput::Unit)
    }
}

/// Requests a bucket; its provisioner creates the credential secret later.
pub struct BucketClaimNode {
    client: Client,
    claim: ObjectBucketClaim,
}

impl BucketClaimNode {
    pub fn new(client: Client, claim: ObjectBucketClaim) -> Self {
        Self { client, claim }
    }
}

#[async_trait]
impl Node for BucketClaimNode {
    async fn evaluate(
        &self,
        _inputs: &Inputs,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<NodeOutput> {
        if !bucket_claim_crd_installed(&self.client).await? {
            return Err(CredwaitError::CrdNotInstalled(
                "objectbucket.io/v1alpha1 ObjectBucketClaim is not served by the cluster".to_string(),
            )
            .into());
        }

        let applied = apply_bucket_claim(&self.client, &self.claim).await?;
        info!(
            "Bucket claim {} applied, credentials expected in secret {}",
            applied.name_any(),
            applied.credentials_secret_name()
        );
        Ok(NodeOutput::Unit)
    }
}
