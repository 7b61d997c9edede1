//! Configuration for the scale signal exporter service

use clap::Parser;
use std::env;
use std::time::Duration;

use crate::policy::Thresholds;
use crate::source::QuerySpec;

const DEFAULT_ONPREM_URL: &str = "http://prometheus-onprem.monitoring.svc.cluster.local:9090";
const DEFAULT_CLOUD_URL: &str =
    "http://kube-prometheus-stack-prometheus.monitoring.svc.cluster.local:9090";
const DEFAULT_WORKLOAD_JOB: &str = "nim-llm-llama3-8b-instruct";

/// Configuration for the scale signal exporter
#[derive(Debug, Clone, Parser)]
#[command(name = "scale-signal-exporter")]
#[command(about = "Polls workload-pressure metrics and publishes a scaling signal gauge")]
pub struct Config {
    /// On-prem Prometheus base URL
    #[arg(long, env, default_value = DEFAULT_ONPREM_URL)]
    pub onprem_url: String,

    /// Cloud Prometheus base URL
    #[arg(long, env, default_value = DEFAULT_CLOUD_URL)]
    pub cloud_url: String,

    /// Job label identifying the workload on both Prometheus instances
    #[arg(long, env, default_value = DEFAULT_WORKLOAD_JOB)]
    pub workload_job: String,

    /// Port serving the scrape endpoint for the signal gauge
    #[arg(long, env, default_value_t = 8000)]
    pub metrics_port: u16,

    /// Seconds to sleep between pipeline cycles
    #[arg(long, env, default_value_t = 30)]
    pub poll_interval_secs: u64,

    /// Per-attempt timeout for backend queries in seconds
    #[arg(long, env, default_value_t = 10)]
    pub query_timeout_secs: u64,

    /// Attempts per backend query before giving up
    #[arg(long, env, default_value_t = 3)]
    pub query_attempts: u32,

    /// Backoff between query attempts in milliseconds
    #[arg(long, env, default_value_t = 1000)]
    pub retry_backoff_ms: u64,

    /// On-prem waiting-requests level above which we scale up
    #[arg(long, env, default_value_t = 20.0)]
    pub onprem_waiting_high: f64,

    /// Cloud running-requests level above which we scale up
    #[arg(long, env, default_value_t = 10.0)]
    pub cloud_running_high: f64,

    /// Cloud running-requests level below which we scale down
    #[arg(long, env, default_value_t = 5.0)]
    pub cloud_running_low: f64,

    /// Output logs in JSON format
    #[arg(long, env)]
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            onprem_url: env::var("ONPREM_URL").unwrap_or_else(|_| DEFAULT_ONPREM_URL.to_string()),
            cloud_url: env::var("CLOUD_URL").unwrap_or_else(|_| DEFAULT_CLOUD_URL.to_string()),
            workload_job: env::var("WORKLOAD_JOB")
                .unwrap_or_else(|_| DEFAULT_WORKLOAD_JOB.to_string()),
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            query_timeout_secs: env::var("QUERY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            query_attempts: env::var("QUERY_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            retry_backoff_ms: env::var("RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            onprem_waiting_high: env::var("ONPREM_WAITING_HIGH")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20.0),
            cloud_running_high: env::var("CLOUD_RUNNING_HIGH")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10.0),
            cloud_running_low: env::var("CLOUD_RUNNING_LOW")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5.0),
            log_json: env::var("LOG_JSON")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Parse configuration from command-line args and environment variables
    pub fn parse_config() -> Self {
        Config::parse()
    }

    /// The query specs evaluated each cycle, in pipeline order: on-prem
    /// waiting, cloud running, cloud waiting.
    pub fn query_specs(&self) -> Vec<QuerySpec> {
        vec![
            QuerySpec::new(
                &self.onprem_url,
                format!(r#"num_requests_waiting{{job="{}"}}"#, self.workload_job),
            ),
            QuerySpec::new(
                &self.cloud_url,
                format!(
                    r#"avg(avg_over_time(num_requests_running{{job="{}"}}[2m]))"#,
                    self.workload_job
                ),
            ),
            QuerySpec::new(
                &self.cloud_url,
                format!(
                    r#"avg(avg_over_time(num_requests_waiting{{job="{}"}}[2m]))"#,
                    self.workload_job
                ),
            ),
        ]
    }

    /// Threshold knobs for the decision policy
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            onprem_waiting_high: self.onprem_waiting_high,
            cloud_running_high: self.cloud_running_high,
            cloud_running_low: self.cloud_running_low,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            onprem_url: "http://onprem:9090".to_string(),
            cloud_url: "http://cloud:9090".to_string(),
            workload_job: "llm-serving".to_string(),
            metrics_port: 8000,
            poll_interval_secs: 30,
            query_timeout_secs: 10,
            query_attempts: 3,
            retry_backoff_ms: 1000,
            onprem_waiting_high: 20.0,
            cloud_running_high: 10.0,
            cloud_running_low: 5.0,
            log_json: false,
        }
    }

    #[test]
    fn query_specs_are_ordered_and_parameterized() {
        let specs = test_config().query_specs();
        assert_eq!(specs.len(), 3);

        assert_eq!(specs[0].endpoint, "http://onprem:9090");
        assert_eq!(specs[0].expr, r#"num_requests_waiting{job="llm-serving"}"#);

        assert_eq!(specs[1].endpoint, "http://cloud:9090");
        assert_eq!(
            specs[1].expr,
            r#"avg(avg_over_time(num_requests_running{job="llm-serving"}[2m]))"#
        );

        assert_eq!(specs[2].endpoint, "http://cloud:9090");
        assert_eq!(
            specs[2].expr,
            r#"avg(avg_over_time(num_requests_waiting{job="llm-serving"}[2m]))"#
        );
    }

    #[test]
    fn thresholds_carry_the_configured_levels() {
        let mut config = test_config();
        config.onprem_waiting_high = 42.0;

        let thresholds = config.thresholds();
        assert_eq!(thresholds.onprem_waiting_high, 42.0);
        assert_eq!(thresholds.cloud_running_high, 10.0);
        assert_eq!(thresholds.cloud_running_low, 5.0);
    }

    #[test]
    fn duration_helpers_convert_units() {
        let config = test_config();
        assert_eq!(config.query_timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_backoff(), Duration::from_millis(1000));
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
    }
}
