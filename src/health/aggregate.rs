//! Health aggregation
//!
//! A deterministic, side-effect-free reduction over already-computed
//! probe results. No retries, no IO; `overall_status` is a pure
//! function of the checks map and nothing else may set it.

use crate::probes::{ProbeResult, ProbeStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Name of the synthesized summary entry in the checks map
pub const OVERALL_CHECK: &str = "overall";

/// Overall health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every check passed
    Healthy,
    /// At least one check warned, none failed
    Degraded,
    /// At least one check failed
    Unhealthy,
}

impl OverallStatus {
    /// Transport-level status code for this verdict
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Healthy | Self::Degraded => 200,
            Self::Unhealthy => 503,
        }
    }

    /// Tri-state equivalent for the synthesized `overall` entry
    pub fn as_probe_status(&self) -> ProbeStatus {
        match self {
            Self::Healthy => ProbeStatus::Pass,
            Self::Degraded => ProbeStatus::Warn,
            Self::Unhealthy => ProbeStatus::Fail,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

/// Timing metrics for one aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthMetrics {
    /// Wall-clock time of the whole check sequence
    pub response_time_ms: u64,
    /// Time since process start
    pub uptime_ms: u64,
}

/// Terminal value of one health check invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAggregate {
    /// Overall verdict
    pub overall_status: OverallStatus,
    /// Probe results keyed by check name, plus the `overall` entry
    pub checks: BTreeMap<String, ProbeResult>,
    /// Timing metrics
    pub metrics: HealthMetrics,
}

/// Reduce probe results into an overall verdict.
///
/// Precedence: any fail → unhealthy; else any warn → degraded; else
/// healthy. The synthesized `overall` entry mirrors the verdict and
/// summarizes the offending checks.
pub fn aggregate(
    mut checks: BTreeMap<String, ProbeResult>,
    response_time: Duration,
    uptime: Duration,
) -> HealthAggregate {
    let any_fail = checks.values().any(|c| c.status == ProbeStatus::Fail);
    let any_warn = checks.values().any(|c| c.status == ProbeStatus::Warn);

    let overall_status = if any_fail {
        OverallStatus::Unhealthy
    } else if any_warn {
        OverallStatus::Degraded
    } else {
        OverallStatus::Healthy
    };

    let message = match overall_status {
        OverallStatus::Unhealthy => summarize(&checks, ProbeStatus::Fail),
        OverallStatus::Degraded => summarize(&checks, ProbeStatus::Warn),
        OverallStatus::Healthy => "All systems operational".to_string(),
    };

    let metrics = HealthMetrics {
        response_time_ms: response_time.as_millis() as u64,
        uptime_ms: uptime.as_millis() as u64,
    };

    checks.insert(
        OVERALL_CHECK.to_string(),
        ProbeResult {
            status: overall_status.as_probe_status(),
            message,
            details: None,
            latency_ms: metrics.response_time_ms,
        },
    );

    HealthAggregate {
        overall_status,
        checks,
        metrics,
    }
}

fn summarize(checks: &BTreeMap<String, ProbeResult>, status: ProbeStatus) -> String {
    checks
        .iter()
        .filter(|(_, c)| c.status == status)
        .map(|(name, c)| format!("{name}: {}", c.message))
        .collect::<Vec<_>>()
        .join(", ")
}
