// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dummysite_operator::config::Config;
use dummysite_operator::content::HttpFetcher;
use dummysite_operator::kubernetes::wait_for_crd;
use dummysite_operator::reconcilers::DummySiteReconciler;
use dummysite_operator::types::DummySite;
use dummysite_operator::watch::{KubeSiteSource, WatchLoop};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting dummy-site operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={} nginx_image={}",
        config.watch_namespace, config.nginx_image
    );

    // Create Kubernetes client (in-cluster first, then kubeconfig)
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for DummySite CRD to become available...");
    wait_for_crd::<DummySite>(&client).await?;

    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let source = KubeSiteSource::new(client.clone(), &config.watch_namespace);
    let reconciler = DummySiteReconciler::new(client, config.clone(), fetcher);

    WatchLoop::new(source, reconciler, config.backoff).run().await?;

    // This should never be reached as the watch loop runs forever
    warn!("Watch loop stopped unexpectedly");
    Ok(())
}
