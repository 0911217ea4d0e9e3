// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry chart values backed by the claimed bucket

use crate::accessor::ResolvedFields;
use crate::constants::bucket_keys;
use crate::error::{CredwaitError, Result};
use crate::graph::{Inputs, Node, NodeOutput};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Where the registry stores image layers
#[derive(Debug, Clone)]
pub struct RegistryStorage {
    pub bucket: String,
    pub endpoint: Url,
    pub region: String,
}

/// Assembles S3 storage values from the bucket credentials of `credentials_node`
pub struct RegistryValuesNode {
    storage: RegistryStorage,
    credentials_node: String,
}

impl RegistryValuesNode {
    pub fn new(storage: RegistryStorage, credentials_node: &str) -> Self {
        Self {
            storage,
            credentials_node: credentials_node.to_string(),
        }
    }
}

#[async_trait]
impl Node for RegistryValuesNode {
    async fn evaluate(
        &self,
        inputs: &Inputs,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<NodeOutput> {
        let credentials = inputs.fields(&self.credentials_node)?;
        Ok(NodeOutput::Value(registry_values(&self.storage, credentials)?))
    }
}

pub fn registry_values(storage: &RegistryStorage, credentials: &ResolvedFields) -> Result<Value> {
    let access_key = credential(credentials, bucket_keys::ACCESS_KEY_ID)?;
    let secret_key = credential(credentials, bucket_keys::SECRET_ACCESS_KEY)?;

    Ok(json!({
        "persistence": {
            "imageChartStorage": {
                "type": "s3",
                "disableredirect": true,
                "s3": {
                    "bucket": storage.bucket,
                    "region": storage.region,
                    "regionendpoint": storage.endpoint.as_str().trim_end_matches('/'),
                    "accesskey": access_key,
                    "secretkey": secret_key,
                    "secure": storage.endpoint.scheme() == "https",
                }
            }
        }
    }))
}

pub fn render_values_yaml(values: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(values)?)
}

fn credential<'a>(credentials: &'a ResolvedFields, key: &str) -> Result<&'a str> {
    let raw = credentials
        .get(key)
        .ok_or_else(|| CredwaitError::InvalidCredentials(format!("missing key {}", key)))?;
    std::str::from_utf8(raw)
        .map_err(|e| CredwaitError::InvalidCredentials(format!("{} is not UTF-8: {}", key, e)))
}
