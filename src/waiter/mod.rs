// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Eventual-consistency waiter: polls until an asynchronously created object exists.

pub mod backoff;
pub mod poller;
pub mod request;
pub mod state;

pub use backoff::{Backoff, BackoffPolicy};
pub use poller::Waiter;
pub use request::{WaitRequest, WaitResult};
pub use state::{Observation, WaitState};
