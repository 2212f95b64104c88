//! Serve command implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use byteworld_api::{serve, shutdown_signal, AppState};
use byteworld_metrics::{RegistryMetrics, ReloadOutcome};
use byteworld_registry::{LookupService, RegistryError, RegistryLayout, RegistryStore};
use clap::Args;
use tracing::{error, info};

use super::{log_violations, RegistryArgs};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BYTEWORLD_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Seconds between registry reloads (0 disables reloading)
    #[arg(long, env = "BYTEWORLD_RELOAD_INTERVAL", default_value = "0")]
    pub reload_interval: u64,
}

/// Runs the serve command.
///
/// The registry must load cleanly before the server starts. Later reloads
/// that fail keep the previous snapshot serving.
pub async fn run(registry: &RegistryArgs, args: &ServeArgs) -> Result<()> {
    let layout = Arc::new(registry.layout()?);
    let store = Arc::new(RegistryStore::new());
    let metrics = Arc::new(RegistryMetrics::new()?);

    info!(root = %registry.root.display(), "Loading registry");
    let initial = {
        let (layout, store, metrics) = (Arc::clone(&layout), Arc::clone(&store), Arc::clone(&metrics));
        tokio::task::spawn_blocking(move || reload(&layout, &store, &metrics)).await?
    };
    initial.context("Registry failed to load, refusing to serve")?;

    let reloader = (args.reload_interval > 0).then(|| {
        let period = Duration::from_secs(args.reload_interval);
        info!(interval_secs = args.reload_interval, "Periodic reload enabled");
        tokio::spawn(reload_loop(period, layout, Arc::clone(&store), Arc::clone(&metrics)))
    });

    let state = AppState::new(LookupService::new(store), metrics);
    let served = serve(args.bind, state, shutdown_signal()).await;

    if let Some(task) = reloader {
        task.abort();
    }
    served.with_context(|| format!("Server on {} failed", args.bind))
}

/// Rebuilds the registry and records the outcome in `metrics`.
fn reload(
    layout: &RegistryLayout,
    store: &RegistryStore,
    metrics: &RegistryMetrics,
) -> Result<(), RegistryError> {
    match store.reload(layout) {
        Ok(index) => {
            metrics.record_reload(ReloadOutcome::Success);
            metrics.observe_stats(&index.stats(), store.generation());
            Ok(())
        }
        Err(err) => {
            metrics.record_reload(ReloadOutcome::Rejected);
            log_violations(&err);
            Err(err)
        }
    }
}

async fn reload_loop(
    period: Duration,
    layout: Arc<RegistryLayout>,
    store: Arc<RegistryStore>,
    metrics: Arc<RegistryMetrics>,
) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately; the initial load already ran.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let (layout, store, metrics) = (Arc::clone(&layout), Arc::clone(&store), Arc::clone(&metrics));
        match tokio::task::spawn_blocking(move || reload(&layout, &store, &metrics)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(error = %err, "Registry reload failed"),
            Err(err) => error!(error = %err, "Registry reload task panicked"),
        }
    }
}
