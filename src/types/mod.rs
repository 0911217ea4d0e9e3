// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod bucket_claim;

pub use bucket_claim::{ObjectBucketClaim, ObjectBucketClaimSpec, ObjectBucketClaimStatus};
