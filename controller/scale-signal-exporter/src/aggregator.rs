//! Concurrent fan-out of the per-cycle backend queries

use futures_util::future::join_all;

use crate::source::{QueryBackend, QuerySpec};

/// The workload-pressure readings feeding the decision policy.
///
/// Each slot is `None` when its query failed this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadMetrics {
    /// Requests waiting on the on-prem serving stack
    pub onprem_waiting: Option<f64>,
    /// Requests running on the cloud serving stack (2m average)
    pub cloud_running: Option<f64>,
    /// Requests waiting on the cloud serving stack (2m average)
    pub cloud_waiting: Option<f64>,
}

impl WorkloadMetrics {
    /// Map a result row from [`collect`] onto the named readings, in
    /// query-spec order: on-prem waiting, cloud running, cloud waiting.
    pub fn from_results(results: &[Option<f64>]) -> Self {
        Self {
            onprem_waiting: results.first().copied().flatten(),
            cloud_running: results.get(1).copied().flatten(),
            cloud_waiting: results.get(2).copied().flatten(),
        }
    }
}

/// Evaluate every spec against the backend concurrently, returning one
/// outcome per spec in spec order.
///
/// Resolves only once every query has settled (succeeded or exhausted its
/// retries); the policy never sees a partial cycle.
pub async fn collect<B: QueryBackend>(backend: &B, specs: &[QuerySpec]) -> Vec<Option<f64>> {
    join_all(
        specs
            .iter()
            .map(|spec| backend.fetch(&spec.endpoint, &spec.expr)),
    )
    .await
}
