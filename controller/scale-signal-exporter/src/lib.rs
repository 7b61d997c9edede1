//! Scale Signal Exporter - polls workload-pressure metrics and publishes a
//! scaling signal gauge for an external autoscaler.
//!
//! The pipeline queries an on-prem and a cloud Prometheus on a fixed
//! interval, degrades gracefully when sources are partially or fully
//! unavailable, and folds the readings through a threshold policy into a
//! single bounded signal served on a scrape endpoint.

pub mod aggregator;
pub mod config;
pub mod controller;
pub mod exporter;
pub mod policy;
pub mod source;

pub use aggregator::{collect, WorkloadMetrics};
pub use config::Config;
pub use controller::SignalController;
pub use exporter::SignalExporter;
pub use policy::{decide, ScaleSignal, Thresholds};
pub use source::{PrometheusClient, QueryBackend, QuerySpec};
