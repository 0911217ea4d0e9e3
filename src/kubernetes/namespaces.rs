// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment namespace

use crate::constants::FIELD_MANAGER;
use crate::error::{CredwaitError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{ObjectMeta, Patch, PatchParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Apply the deployment namespace with server-side apply.
///
/// Applying is idempotent: an existing namespace, or one created concurrently
/// by someone else, is accepted as is.
#[instrument(skip(client))]
pub async fn apply_namespace(client: &Client, namespace: &str) -> Result<Namespace> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                "app.kubernetes.io/managed-by".to_string(),
                FIELD_MANAGER.to_string(),
            )])),
            ..Default::default()
        },
        ..Default::default()
    };

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    let applied = namespaces
        .patch(namespace, &pp, &Patch::Apply(&ns))
        .await
        .map_err(|e| {
            CredwaitError::NamespaceError(format!("Failed to apply namespace {}: {}", namespace, e))
        })?;

    info!("Namespace {} applied", namespace);
    Ok(applied)
}
