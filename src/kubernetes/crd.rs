// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::error::Result;
use crate::types::ObjectBucketClaim;
use kube::{discovery::Discovery, Client, Resource};
use tracing::{debug, instrument};

/// Check if the ObjectBucketClaim CRD is served by the API server.
#[instrument(skip(client))]
pub async fn bucket_claim_crd_installed(client: &Client) -> Result<bool> {
    let group = ObjectBucketClaim::group(&());
    let version = ObjectBucketClaim::version(&());
    let kind = ObjectBucketClaim::kind(&());

    let discovery = Discovery::new(client.clone())
        .filter(&[group.as_ref()])
        .run()
        .await?;

    let found = discovery
        .groups()
        .filter(|g| g.name() == group)
        .flat_map(|g| g.recommended_resources())
        .any(|(ar, _)| ar.kind == kind && ar.version == version);

    debug!("{}/{} {} installed: {}", group, version, kind, found);
    Ok(found)
}
