// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "objectbucket.io", version = "v1alpha1", kind = "ObjectBucketClaim")]
#[kube(namespaced)]
#[kube(status = "ObjectBucketClaimStatus")]
#[serde(rename_all = "camelCase")]
pub struct ObjectBucketClaimSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_bucket_name: Option<String>,
    pub storage_class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_config: Option<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBucketClaimStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl ObjectBucketClaim {
    /// Claim for an explicitly named bucket
    pub fn for_bucket(name: &str, namespace: &str, bucket_name: &str, storage_class: &str) -> Self {
        let mut claim = ObjectBucketClaim::new(
            name,
            ObjectBucketClaimSpec {
                bucket_name: Some(bucket_name.to_string()),
                generate_bucket_name: None,
                storage_class_name: storage_class.to_string(),
                additional_config: None,
            },
        );
        claim.metadata.namespace = Some(namespace.to_string());
        claim
    }

    /// Check if the provisioner has bound a bucket to this claim
    pub fn is_bound(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .is_some_and(|phase| phase == "Bound")
    }

    /// The provisioner writes the bucket credentials to a secret named after the claim
    pub fn credentials_secret_name(&self) -> String {
        self.name_any()
    }
}
