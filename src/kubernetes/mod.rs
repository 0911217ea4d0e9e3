// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities: secret lookups, CRD discovery, bucket claims and namespaces.

pub mod bucket_claims;
pub mod crd;
pub mod namespaces;
pub mod secrets;

pub use bucket_claims::apply_bucket_claim;
pub use crd::bucket_claim_crd_installed;
pub use namespaces::apply_namespace;
pub use secrets::SecretAccessor;
