// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::wait;
use crate::waiter::BackoffPolicy;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Deployment configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace all resources are deployed into
    pub deployment_namespace: String,
    pub bucket_claim_name: String,
    pub bucket_name: String,
    pub bucket_storage_class: String,
    /// S3 endpoint handed to the registry
    pub bucket_endpoint: Url,
    pub bucket_region: String,
    /// Backoff used while waiting for the bucket credentials
    pub wait_policy: BackoffPolicy,
    /// Where the rendered registry values are written
    pub registry_values_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let deployment_namespace = lookup("DEPLOYMENT_NAMESPACE")
            .context("DEPLOYMENT_NAMESPACE environment variable not set")?;
        let bucket_claim_name =
            lookup("BUCKET_CLAIM_NAME").unwrap_or_else(|| "registry-bucket".to_string());
        let bucket_name = lookup("BUCKET_NAME").unwrap_or_else(|| bucket_claim_name.clone());
        let bucket_storage_class =
            lookup("BUCKET_STORAGE_CLASS").unwrap_or_else(|| "ceph-bucket".to_string());

        let endpoint = lookup("BUCKET_ENDPOINT")
            .context("BUCKET_ENDPOINT environment variable not set")?;
        let bucket_endpoint = Url::parse(&endpoint)
            .with_context(|| format!("BUCKET_ENDPOINT is not a valid URL: {}", endpoint))?;
        let bucket_region = lookup("BUCKET_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let wait_policy = BackoffPolicy::new(
            parse_or(&lookup, "WAIT_MAX_ATTEMPTS", wait::MAX_ATTEMPTS)?,
            Duration::from_millis(parse_or(&lookup, "WAIT_INITIAL_DELAY_MS", wait::INITIAL_DELAY_MS)?),
            Duration::from_millis(parse_or(&lookup, "WAIT_MAX_DELAY_MS", wait::MAX_DELAY_MS)?),
        );

        let registry_values_path = lookup("REGISTRY_VALUES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("registry-values.yaml"));

        Ok(Config {
            deployment_namespace,
            bucket_claim_name,
            bucket_name,
            bucket_storage_class,
            bucket_endpoint,
            bucket_region,
            wait_policy,
            registry_values_path,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}
