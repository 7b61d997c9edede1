//! Scale signal exporter binary - polls workload metrics and serves the signal gauge

use anyhow::{Context, Result};
use scale_signal_exporter::{Config, PrometheusClient, SignalController, SignalExporter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse_config();

    // Initialize logging
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    info!("Starting scale signal exporter");
    info!("Configuration:");
    info!("  On-prem backend: {}", config.onprem_url);
    info!("  Cloud backend: {}", config.cloud_url);
    info!("  Workload job: {}", config.workload_job);
    info!("  Poll interval: {}s", config.poll_interval_secs);
    info!("  Query budget: {} attempts, {}s timeout", config.query_attempts, config.query_timeout_secs);
    info!("  Metrics port: {}", config.metrics_port);

    let exporter = SignalExporter::new()?;

    // Serve the gauge before the first cycle so scrapes never 404
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.metrics_port))
        .await
        .with_context(|| format!("Failed to bind scrape endpoint on port {}", config.metrics_port))?;
    info!("Scrape endpoint listening on port {}", config.metrics_port);

    let app = exporter.clone().router();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "scrape endpoint terminated");
        }
    });

    let backend = PrometheusClient::new(
        config.query_timeout(),
        config.query_attempts,
        config.retry_backoff(),
    )?;

    let controller = SignalController::new(&config, backend, exporter);
    controller.run().await;

    Ok(())
}
