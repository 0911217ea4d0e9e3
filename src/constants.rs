// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager used for server-side apply
pub const FIELD_MANAGER: &str = "credwait";

/// Waiter backoff defaults
pub mod wait {
    /// Upper bound on lookups per wait
    pub const MAX_ATTEMPTS: u32 = 20;
    /// Delay after the first unsuccessful lookup, in milliseconds
    pub const INITIAL_DELAY_MS: u64 = 2_000;
    /// Backoff cap, in milliseconds
    pub const MAX_DELAY_MS: u64 = 15_000;
}

/// Keys written by bucket provisioners into the claim's credential secret
pub mod bucket_keys {
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
}

/// Node ids of the deployment graph
pub mod nodes {
    pub const NAMESPACE: &str = "namespace";
    pub const BUCKET_CLAIM: &str = "bucket-claim";
    pub const BUCKET_CREDENTIALS: &str = "bucket-credentials";
    pub const REGISTRY_VALUES: &str = "registry-values";
}
