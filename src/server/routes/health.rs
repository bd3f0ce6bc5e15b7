//! Health check and status endpoints

use crate::config::validate;
use crate::context::{check_names, run_health_check};
use crate::health::{HealthAggregate, HealthMetrics, OverallStatus};
use crate::probes::{ProbeResult, checks};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpResponse, Result as ActixResult, web};
use futures::FutureExt;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/configuration", web::get().to(configuration_check))
            .route("/identity-provider", web::get().to(identity_check))
            .route("/database", web::get().to(database_check)),
    )
    .route("/version", web::get().to(version_info));
}

/// Aggregate health endpoint
///
/// Consumed by load balancers and uptime monitors. Always answers with
/// a well-formed JSON body; an internal error in the check sequence
/// itself degrades to the critical-error shape instead of a bare 500.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let aggregate = match AssertUnwindSafe(run_health_check(&state.context))
        .catch_unwind()
        .await
    {
        Ok(aggregate) => aggregate,
        Err(_) => {
            error!("Health check sequence panicked, reporting critical error");
            critical_error_aggregate()
        }
    };

    let body = HealthResponseBody {
        status: aggregate.overall_status,
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        environment: state.context.config.environment.as_str(),
        checks: aggregate.checks,
        metrics: aggregate.metrics,
    };

    Ok(HttpResponse::build(transport_status(aggregate.overall_status))
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header(("X-Health-Status", aggregate.overall_status.as_str()))
        .insert_header((
            "X-Response-Time-Ms",
            aggregate.metrics.response_time_ms.to_string(),
        ))
        .json(body))
}

/// Configuration probe endpoint for the setup surface
async fn configuration_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let context = &state.context;
    let result = checks::configuration_probe(context.env.as_ref(), context.config.strictness());
    let report = validate(context.env.as_ref(), context.config.strictness());

    Ok(HttpResponse::Ok().json(ApiResponse::success(ConfigurationCheckBody {
        probe: result,
        validation: report,
    })))
}

/// Identity provider probe endpoint for the setup surface
async fn identity_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let result = checks::identity_probe(&state.context).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// Database probe endpoint for the setup surface
async fn database_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let result = checks::database_probe(&state.context).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// Version and build information endpoint
async fn version_info() -> HttpResponse {
    let info = VersionInfo {
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        rust_version: Cow::Borrowed(env!("RUST_VERSION")),
    };
    HttpResponse::Ok().json(ApiResponse::success(info))
}

fn transport_status(status: OverallStatus) -> StatusCode {
    match status {
        OverallStatus::Healthy | OverallStatus::Degraded => StatusCode::OK,
        OverallStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Aggregate reporting every check as failed, for the case where the
/// checking machinery itself broke
fn critical_error_aggregate() -> HealthAggregate {
    let mut checks = BTreeMap::new();
    for name in [
        check_names::CONFIGURATION,
        check_names::IDENTITY_PROVIDER,
        check_names::DATABASE,
    ] {
        checks.insert(
            name.to_string(),
            ProbeResult::fail("Not checked - critical error"),
        );
    }
    crate::health::aggregate(checks, std::time::Duration::ZERO, std::time::Duration::ZERO)
}

/// Serialized body of the aggregate health endpoint
#[derive(Debug, Clone, serde::Serialize)]
struct HealthResponseBody {
    status: OverallStatus,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    environment: &'static str,
    checks: BTreeMap<String, ProbeResult>,
    metrics: HealthMetrics,
}

/// Configuration check with the full validation report attached
#[derive(Debug, Clone, serde::Serialize)]
struct ConfigurationCheckBody {
    probe: ProbeResult,
    validation: crate::config::ValidationReport,
}

/// Version information
#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    version: Cow<'static, str>,
    build_time: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    rust_version: Cow<'static, str>,
}
