// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment graph: nodes with explicit dependencies and outputs.

pub mod engine;
pub mod node;

pub use engine::{Evaluation, Graph};
pub use node::{Inputs, Node, NodeOutput, WaitNode};
