// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod accessor;
pub mod config;
pub mod constants;
pub mod error;
pub mod graph;
pub mod kubernetes;
pub mod stack;
pub mod types;
pub mod waiter;

#[cfg(test)]
pub mod test_utils;
