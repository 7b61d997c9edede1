//! Signal gauge registry and scrape endpoint

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{Gauge, Registry, TextEncoder};

/// Owns the registry and the single gauge scraped by the external
/// autoscaler. Cloning shares the underlying registry.
#[derive(Clone)]
pub struct SignalExporter {
    registry: Registry,
    signal: Gauge,
}

impl SignalExporter {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let signal = Gauge::new(
            "scale_signal",
            "Workload scaling signal: 1 scale up, 0 scale down, 0.5 hold",
        )
        .context("Failed to create signal gauge")?;

        registry
            .register(Box::new(signal.clone()))
            .context("Failed to register signal gauge")?;

        Ok(Self { registry, signal })
    }

    /// Publish a new signal value. The gauge's atomic storage means the
    /// scrape handler sees either the old or the new value, never a tear.
    pub fn set(&self, value: f64) {
        self.signal.set(value);
    }

    /// Currently published value
    pub fn value(&self) -> f64 {
        self.signal.get()
    }

    /// Render the registry in the Prometheus text exposition format
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .context("Failed to encode metrics")
    }

    /// Router serving `/metrics` and `/healthz`
    pub fn router(self) -> Router {
        Router::new()
            .route("/metrics", get(metrics))
            .route("/healthz", get(healthz))
            .with_state(self)
    }
}

async fn metrics(State(exporter): State<SignalExporter>) -> Response {
    match exporter.render() {
        Ok(body) => body.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to render metrics: {e}"),
        )
            .into_response(),
    }
}

async fn healthz() -> &'static str {
    "OK"
}
