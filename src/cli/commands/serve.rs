use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;

pub async fn cmd_serve(
    config: Config,
    port: Option<u16>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);
    info!("reelbase v{} starting API...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state_from_config(config, prometheus_handle)
        .await
        .context("Failed to initialize API state")?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Error listening for shutdown: {}", e),
            }
        })
        .await?;

    info!("API stopped");
    Ok(())
}
