//! Prometheus instant-query client with per-attempt timeout and bounded retry

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

/// One backend/query pairing, evaluated once per pipeline cycle
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Base URL of the Prometheus instance
    pub endpoint: String,
    /// PromQL expression for an instant query
    pub expr: String,
}

impl QuerySpec {
    pub fn new(endpoint: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            expr: expr.into(),
        }
    }
}

/// Query backend trait - implement this to swap out the metric source
///
/// Implementations must collapse every failure mode (timeout, transport
/// error, bad status, malformed body) to `None`; callers never see errors.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Evaluate `expr` against `endpoint` and return the first sample value
    async fn fetch(&self, endpoint: &str, expr: &str) -> Option<f64>;
}

/// Instant query response: `data.result[0].value[1]` carries the sample
/// as a stringified number.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: QueryData,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    result: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    value: (f64, String),
}

/// HTTP client for the Prometheus query API
pub struct PrometheusClient {
    client: reqwest::Client,
    max_attempts: u32,
    backoff: Duration,
}

impl PrometheusClient {
    /// Create a new client with a per-attempt timeout, an attempt budget
    /// (clamped to at least one), and a fixed backoff between attempts.
    pub fn new(timeout: Duration, max_attempts: u32, backoff: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            backoff,
        })
    }

    async fn attempt(&self, endpoint: &str, expr: &str) -> Result<f64> {
        let response = self
            .client
            .get(format!("{}/api/v1/query", endpoint))
            .query(&[("query", expr)])
            .send()
            .await
            .context("query request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("unexpected status {}", status);
        }

        let body: QueryResponse = response
            .json()
            .await
            .context("malformed query response body")?;

        let entry = body.data.result.first().context("empty result set")?;
        let value: f64 = entry
            .value
            .1
            .parse()
            .context("unparsable sample value")?;
        anyhow::ensure!(value.is_finite(), "non-finite sample value {}", value);

        Ok(value)
    }
}

#[async_trait]
impl QueryBackend for PrometheusClient {
    async fn fetch(&self, endpoint: &str, expr: &str) -> Option<f64> {
        debug!(endpoint = %endpoint, expr = %expr, "issuing instant query");

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.backoff).await;
            }

            match self.attempt(endpoint, expr).await {
                Ok(value) => {
                    debug!(endpoint = %endpoint, value, "query succeeded");
                    return Some(value);
                }
                Err(e) => {
                    warn!(
                        endpoint = %endpoint,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "query attempt failed"
                    );
                }
            }
        }

        error!(
            endpoint = %endpoint,
            attempts = self.max_attempts,
            "giving up on backend after exhausting attempts"
        );
        None
    }
}
