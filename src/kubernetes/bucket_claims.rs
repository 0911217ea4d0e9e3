// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ObjectBucketClaim creation

use crate::constants::FIELD_MANAGER;
use crate::error::Result;
use crate::types::ObjectBucketClaim;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, ResourceExt,
};
use tracing::{info, instrument};

/// Apply the claim (create or update) with server-side apply
#[instrument(skip(client, claim), fields(claim = %claim.name_any()))]
pub async fn apply_bucket_claim(
    client: &Client,
    claim: &ObjectBucketClaim,
) -> Result<ObjectBucketClaim> {
    let namespace = claim.namespace().unwrap_or_else(|| "default".to_string());
    let claims: Api<ObjectBucketClaim> = Api::namespaced(client.clone(), &namespace);

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    let applied = claims
        .patch(&claim.name_any(), &pp, &Patch::Apply(claim))
        .await?;

    info!(
        "Applied ObjectBucketClaim {}/{} (bound: {})",
        namespace,
        applied.name_any(),
        applied.is_bound()
    );
    Ok(applied)
}
