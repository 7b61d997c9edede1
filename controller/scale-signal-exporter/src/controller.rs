//! Pipeline loop: query all sources, decide, publish

use std::time::Duration;

use tracing::{error, info, warn};

use crate::aggregator::{collect, WorkloadMetrics};
use crate::config::Config;
use crate::exporter::SignalExporter;
use crate::policy::{decide, ScaleSignal, Thresholds};
use crate::source::{QueryBackend, QuerySpec};

/// Drives one pipeline cycle per poll interval, forever.
pub struct SignalController<B: QueryBackend> {
    backend: B,
    exporter: SignalExporter,
    specs: Vec<QuerySpec>,
    thresholds: Thresholds,
    poll_interval: Duration,
}

impl<B: QueryBackend> SignalController<B> {
    pub fn new(config: &Config, backend: B, exporter: SignalExporter) -> Self {
        Self {
            backend,
            exporter,
            specs: config.query_specs(),
            thresholds: config.thresholds(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Run cycles until the process is terminated.
    ///
    /// A failed cycle is logged and never skips the inter-cycle sleep; the
    /// previously published signal stays on the gauge until a later cycle
    /// replaces it.
    pub async fn run(&self) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            specs = self.specs.len(),
            "signal controller started"
        );

        loop {
            match self.run_cycle().await {
                Ok(signal) => {
                    info!(
                        signal = ?signal,
                        value = signal.value(),
                        "published scaling signal"
                    );
                }
                Err(e) => {
                    error!(error = %e, "pipeline cycle failed, keeping previous signal");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One full pass: query every source, decide, publish.
    pub async fn run_cycle(&self) -> anyhow::Result<ScaleSignal> {
        let results = collect(&self.backend, &self.specs).await;
        let metrics = WorkloadMetrics::from_results(&results);

        info!(
            onprem_waiting = ?metrics.onprem_waiting,
            cloud_running = ?metrics.cloud_running,
            cloud_waiting = ?metrics.cloud_waiting,
            "collected workload readings"
        );

        let signal = decide(
            metrics.onprem_waiting,
            metrics.cloud_running,
            metrics.cloud_waiting,
            &self.thresholds,
        );

        if signal == ScaleSignal::SourcesDown {
            error!("all backends failed to respond, publishing fallback signal");
        } else {
            if metrics.onprem_waiting.is_none() {
                warn!("treating on-prem waiting requests as 0 after query failure");
            }
            if metrics.cloud_running.is_none() {
                warn!("treating cloud running requests as 0 after query failure");
            }
            if metrics.cloud_waiting.is_none() {
                warn!("treating cloud waiting requests as 0 after query failure");
            }
        }

        self.exporter.set(signal.value());
        Ok(signal)
    }
}
