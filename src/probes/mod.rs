//! Dependency probes
//!
//! Tri-state checks over the service's runtime dependencies. Every probe
//! settles into a [`ProbeResult`] with its latency recorded; raw errors
//! never escape a probe boundary.

pub mod checks;

pub use checks::{configuration_probe, database_probe, identity_probe};

use serde::Serialize;
use std::time::Duration;

/// Tri-state health vocabulary shared by probes and checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Dependency is fully operational
    Pass,
    /// Dependency is degraded or intentionally disabled
    Warn,
    /// Dependency is broken
    Fail,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

/// Output of one dependency check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    /// Tri-state status, set exactly once per probe invocation
    pub status: ProbeStatus,
    /// Short description
    pub message: String,
    /// Optional structured diagnostic payload, opaque to the aggregator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Elapsed wall-clock time of the probe, recorded even on failure
    pub latency_ms: u64,
}

impl ProbeResult {
    /// A passing result
    pub fn pass(message: impl Into<String>) -> Self {
        Self::with_status(ProbeStatus::Pass, message)
    }

    /// A degraded result
    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_status(ProbeStatus::Warn, message)
    }

    /// A failing result
    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_status(ProbeStatus::Fail, message)
    }

    fn with_status(status: ProbeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            latency_ms: 0,
        }
    }

    /// Attach a diagnostic payload
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Record the probe's elapsed time
    pub fn with_latency(mut self, elapsed: Duration) -> Self {
        self.latency_ms = elapsed.as_millis() as u64;
        self
    }
}
