//! Threshold policy folding workload readings into a scaling signal

/// Scaling signal consumed by the external autoscaler.
///
/// `SourcesDown` and `Hold` publish the same gauge value; the variants stay
/// separate so a total outage is observable as its own outcome rather than
/// blending into steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleSignal {
    /// Shift more load to the cloud
    ScaleUp,
    /// Shift load back on-prem
    ScaleDown,
    /// Keep the current split
    Hold,
    /// Every source failed this cycle; hold at the fallback value
    SourcesDown,
}

impl ScaleSignal {
    /// Gauge encoding: 1 scale up, 0 scale down, 0.5 hold.
    pub fn value(self) -> f64 {
        match self {
            ScaleSignal::ScaleUp => 1.0,
            ScaleSignal::ScaleDown => 0.0,
            ScaleSignal::Hold | ScaleSignal::SourcesDown => 0.5,
        }
    }
}

/// Threshold knobs for the decision policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// On-prem waiting requests above this level force a scale-up
    pub onprem_waiting_high: f64,
    /// Cloud running requests above this level force a scale-up
    pub cloud_running_high: f64,
    /// Cloud running requests below this level allow a scale-down
    pub cloud_running_low: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            onprem_waiting_high: 20.0,
            cloud_running_high: 10.0,
            cloud_running_low: 5.0,
        }
    }
}

/// Fold the cycle's readings into a signal. First matching threshold wins.
///
/// A reading that failed this cycle counts as zero pressure, except when
/// every source failed, which reports [`ScaleSignal::SourcesDown`].
/// `cloud_waiting` participates only in the outage check; no threshold
/// reads it today.
pub fn decide(
    onprem_waiting: Option<f64>,
    cloud_running: Option<f64>,
    cloud_waiting: Option<f64>,
    thresholds: &Thresholds,
) -> ScaleSignal {
    if onprem_waiting.is_none() && cloud_running.is_none() && cloud_waiting.is_none() {
        return ScaleSignal::SourcesDown;
    }

    let onprem_waiting = onprem_waiting.unwrap_or(0.0);
    let cloud_running = cloud_running.unwrap_or(0.0);

    if onprem_waiting > thresholds.onprem_waiting_high {
        ScaleSignal::ScaleUp
    } else if cloud_running > thresholds.cloud_running_high {
        ScaleSignal::ScaleUp
    } else if cloud_running < thresholds.cloud_running_low {
        ScaleSignal::ScaleDown
    } else {
        ScaleSignal::Hold
    }
}
