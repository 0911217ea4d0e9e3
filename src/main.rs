// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use credwait::config::Config;
use credwait::constants::nodes;
use credwait::graph::NodeOutput;
use credwait::stack::{build_graph, render_values_yaml};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting credwait");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, bucket_claim={}, max_attempts={}, worst_case_wait={:?}",
        config.deployment_namespace,
        config.bucket_claim_name,
        config.wait_policy.max_attempts,
        config.wait_policy.worst_case_delay()
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling deployment");
            on_signal.cancel();
        }
    });

    let graph = build_graph(client, &config)?;
    let evaluation = graph.evaluate(&cancel).await?;

    if let Some(NodeOutput::Fields(fields)) = evaluation.get(nodes::BUCKET_CREDENTIALS) {
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        info!("Bucket credentials resolved with keys: {}", keys.join(", "));
    }

    let Some(NodeOutput::Value(values)) = evaluation.get(nodes::REGISTRY_VALUES) else {
        anyhow::bail!("Deployment finished without registry values");
    };
    let yaml = render_values_yaml(values)?;
    tokio::fs::write(&config.registry_values_path, yaml)
        .await
        .with_context(|| {
            format!(
                "Failed to write registry values to {}",
                config.registry_values_path.display()
            )
        })?;

    info!(
        "Registry values written to {}",
        config.registry_values_path.display()
    );
    Ok(())
}
