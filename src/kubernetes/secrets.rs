// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret lookups backing the waiter

use crate::accessor::{ControlPlaneAccessor, Lookup, ResolvedFields, TargetRef};
use crate::error::LookupError;
use async_trait::async_trait;
use bytes::Bytes;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::{debug, instrument};

/// Looks up `core/v1` Secrets.
///
/// The API server's `NotFound` status is the only response reported as
/// absence; everything else, including authorization failures, is an error.
#[derive(Clone)]
pub struct SecretAccessor {
    client: Client,
}

impl SecretAccessor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ControlPlaneAccessor for SecretAccessor {
    #[instrument(skip(self), fields(target = %target))]
    async fn lookup(&self, target: &TargetRef) -> Result<Lookup, LookupError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &target.namespace);

        match secrets.get_opt(&target.name).await? {
            Some(secret) => {
                let fields = secret_fields(&secret);
                debug!("Secret {} found with {} keys", target, fields.len());
                Ok(Lookup::Found(fields))
            }
            None => {
                debug!("Secret {} does not exist yet", target);
                Ok(Lookup::NotFound)
            }
        }
    }
}

/// Flatten `data` and `stringData` into one field map; `data` wins on conflicts
fn secret_fields(secret: &Secret) -> ResolvedFields {
    let mut fields: ResolvedFields = secret
        .string_data
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), Bytes::from(v.clone())))
        .collect();

    fields.extend(
        secret
            .data
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), Bytes::from(v.0.clone()))),
    );
    fields
}
