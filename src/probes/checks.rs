//! The three dependency probes
//!
//! Configuration, identity provider, and database. Network-bound probes
//! run under the network-transient retry preset with a bounded
//! per-attempt timeout; a timeout is an ordinary retryable failure.

use super::{ProbeResult, ProbeStatus};
use crate::config::{EnvSource, Strictness, validate};
use crate::context::ServiceContext;
use crate::utils::error::ServiceError;
use crate::utils::retry::RetryPolicy;
use serde_json::json;
use std::time::Instant;
use tracing::warn;

/// Validate the platform environment and fold the report into a probe
/// result: errors → fail, warnings only → warn, clean → pass.
pub fn configuration_probe(source: &dyn EnvSource, strictness: Strictness) -> ProbeResult {
    let started = Instant::now();
    let report = validate(source, strictness);

    let mut result = if !report.errors.is_empty() {
        ProbeResult::fail(format!(
            "Missing required configuration: {}",
            report.missing_required.join(", ")
        ))
    } else if !report.warnings.is_empty() {
        ProbeResult::warn(format!(
            "{} configuration warning(s)",
            report.warnings.len()
        ))
    } else {
        ProbeResult::pass("All required settings present")
    };

    if result.status != ProbeStatus::Pass {
        warn!(status = result.status.as_str(), "Configuration probe: {}", result.message);
    }

    result = result.with_details(json!({
        "missing_required": report.missing_required,
        "configured": report.configured.len(),
        "warnings": report.warnings.iter().map(|w| w.message.clone()).collect::<Vec<_>>(),
    }));
    result.with_latency(started.elapsed())
}

/// Probe the identity provider by fetching its discovery document.
///
/// An unreachable provider degrades single sign-on but does not take the
/// application down, so network failures report `warn`; a malformed
/// local configuration reports `fail`.
pub async fn identity_probe(ctx: &ServiceContext) -> ProbeResult {
    let started = Instant::now();

    if !ctx.config.features.sso {
        return ProbeResult::warn("Single sign-on feature disabled")
            .with_latency(started.elapsed());
    }
    if let Some(problem) = ctx.identity.local_config_error() {
        return ProbeResult::fail(format!("Identity provider misconfigured: {problem}"))
            .with_latency(started.elapsed());
    }
    if !ctx.identity.is_configured() {
        return ProbeResult::warn("Identity provider not configured")
            .with_latency(started.elapsed());
    }

    let timeout = ctx.config.probes.attempt_timeout();
    let identity = ctx.identity.clone();
    let outcome = RetryPolicy::network_transient()
        .run(move || {
            let identity = identity.clone();
            async move {
                match tokio::time::timeout(timeout, identity.fetch_discovery_document()).await {
                    Ok(result) => result,
                    Err(_) => Err(ServiceError::Timeout(format!(
                        "discovery fetch exceeded {}s",
                        timeout.as_secs()
                    ))),
                }
            }
        })
        .await;

    let elapsed = started.elapsed();
    match outcome.result {
        Ok(document) => ProbeResult::pass("Identity provider reachable")
            .with_details(json!({
                "issuer": document.issuer,
                "attempts": outcome.attempts,
            }))
            .with_latency(elapsed),
        Err(error) => {
            warn!("Identity provider probe degraded: {}", error);
            ProbeResult::warn(format!("Identity provider unreachable: {error}"))
                .with_details(json!({
                    "error": error.to_string(),
                    "attempts": outcome.attempts,
                }))
                .with_latency(elapsed)
        }
    }
}

/// Probe the hosted database with one bounded read-only query.
///
/// The database is a required integration: any error reports `fail`.
pub async fn database_probe(ctx: &ServiceContext) -> ProbeResult {
    let started = Instant::now();

    if !ctx.config.features.database {
        return ProbeResult::warn("Database feature disabled").with_latency(started.elapsed());
    }
    if !ctx.database.is_configured() {
        return ProbeResult::fail("Database connection not configured")
            .with_latency(started.elapsed());
    }

    let timeout = ctx.config.probes.attempt_timeout();
    let database = ctx.database.clone();
    let outcome = RetryPolicy::network_transient()
        .run(move || {
            let database = database.clone();
            async move {
                match tokio::time::timeout(timeout, database.run_health_query()).await {
                    Ok(result) => result,
                    Err(_) => Err(ServiceError::Timeout(format!(
                        "health query exceeded {}s",
                        timeout.as_secs()
                    ))),
                }
            }
        })
        .await;

    let elapsed = started.elapsed();
    match outcome.result {
        Ok(stats) => ProbeResult::pass("Database reachable")
            .with_details(json!({
                "rows": stats.rows,
                "http_status": stats.http_status,
                "attempts": outcome.attempts,
            }))
            .with_latency(elapsed),
        Err(error) => {
            warn!("Database probe failed: {}", error);
            ProbeResult::fail(format!("Database unreachable: {error}"))
                .with_details(json!({
                    "error": error.to_string(),
                    "attempts": outcome.attempts,
                }))
                .with_latency(elapsed)
        }
    }
}
