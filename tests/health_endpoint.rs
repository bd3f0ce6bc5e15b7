//! HTTP surface integration tests
//!
//! Exercises the aggregate endpoint's status mapping, headers, and
//! critical-error behavior against fake capability clients.

mod common;

use actix_web::{App, test, web};
use common::{FakeDatabase, FakeIdentity, complete_env, context_with};
use std::collections::HashMap;
use terrace_health::config::EnvironmentMode;
use terrace_health::server::AppState;
use terrace_health::server::routes::health::configure_routes;
use terrace_health::{ServiceConfig, ServiceContext};

async fn call_health(
    context: ServiceContext,
) -> (actix_web::http::StatusCode, actix_web::http::header::HeaderMap, serde_json::Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(context)))
            .configure(configure_routes),
    )
    .await;

    let request = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, request).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body: serde_json::Value = test::read_body_json(response).await;
    (status, headers, body)
}

#[actix_web::test]
async fn all_pass_returns_200_healthy() {
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        FakeIdentity::default(),
        FakeDatabase::default(),
    );

    let (status, headers, body) = call_health(context).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["overall"]["message"], "All systems operational");
    assert_eq!(headers.get("X-Health-Status").unwrap(), "healthy");
    assert_eq!(
        headers.get("Cache-Control").unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    assert!(headers.contains_key("X-Response-Time-Ms"));
    assert!(body["timestamp"].is_string());
    assert_eq!(body["environment"], "development");
}

#[actix_web::test]
async fn identity_warning_degrades_but_stays_200() {
    let identity = FakeIdentity {
        failure: Some("discovery endpoint returned HTTP 502".to_string()),
        ..FakeIdentity::default()
    };
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        identity,
        FakeDatabase::default(),
    );

    let (status, headers, body) = call_health(context).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["identity-provider"]["status"], "warn");
    assert_eq!(headers.get("X-Health-Status").unwrap(), "degraded");
}

#[actix_web::test]
async fn database_failure_returns_503() {
    let database = FakeDatabase {
        failure: Some("HTTP 500".to_string()),
        ..FakeDatabase::default()
    };
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        FakeIdentity::default(),
        database,
    );

    let (status, _, body) = call_health(context).await;

    assert_eq!(status, 503);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["database"]["status"], "fail");
}

#[actix_web::test]
async fn missing_database_credentials_in_production_returns_503() {
    let mut env = complete_env();
    env.remove("TERRACE_DATABASE_URL");
    env.remove("TERRACE_DATABASE_SERVICE_KEY");

    let mut config = ServiceConfig::default();
    config.environment = EnvironmentMode::Production;

    let context = context_with(config, env, FakeIdentity::default(), FakeDatabase::default());

    let (status, _, body) = call_health(context).await;

    assert_eq!(status, 503);
    assert_eq!(body["checks"]["configuration"]["status"], "fail");
    let message = body["checks"]["configuration"]["message"].as_str().unwrap();
    assert!(message.contains("TERRACE_DATABASE_URL"));
    assert!(message.contains("TERRACE_DATABASE_SERVICE_KEY"));
}

#[actix_web::test]
async fn missing_keys_in_development_only_degrade() {
    let mut env = complete_env();
    env.remove("TERRACE_DATABASE_URL");

    let context = context_with(
        ServiceConfig::default(),
        env,
        FakeIdentity::default(),
        FakeDatabase::default(),
    );

    let (status, _, body) = call_health(context).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["configuration"]["status"], "warn");
}

#[actix_web::test]
async fn panicking_check_sequence_reports_critical_error() {
    let identity = FakeIdentity {
        panic_on_fetch: true,
        ..FakeIdentity::default()
    };
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        identity,
        FakeDatabase::default(),
    );

    let (status, _, body) = call_health(context).await;

    assert_eq!(status, 503);
    assert_eq!(body["status"], "unhealthy");
    for name in ["configuration", "identity-provider", "database"] {
        assert_eq!(body["checks"][name]["message"], "Not checked - critical error");
    }
}

#[actix_web::test]
async fn per_probe_endpoints_answer_independently() {
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        FakeIdentity::default(),
        FakeDatabase::default(),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(context)))
            .configure(configure_routes),
    )
    .await;

    for uri in [
        "/health/configuration",
        "/health/identity-provider",
        "/health/database",
    ] {
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 200, "unexpected status for {uri}");
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], true);
    }
}

#[actix_web::test]
async fn configuration_endpoint_names_missing_keys() {
    let env: HashMap<String, String> = HashMap::new();
    let mut config = ServiceConfig::default();
    config.environment = EnvironmentMode::Production;

    let context = context_with(config, env, FakeIdentity::default(), FakeDatabase::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(context)))
            .configure(configure_routes),
    )
    .await;

    let request = test::TestRequest::get()
        .uri("/health/configuration")
        .to_request();
    let response = test::call_service(&app, request).await;
    let body: serde_json::Value = test::read_body_json(response).await;

    let missing = body["data"]["validation"]["missing_required"]
        .as_array()
        .unwrap();
    assert!(missing.iter().any(|k| k == "TERRACE_DATABASE_URL"));
    assert_eq!(body["data"]["probe"]["status"], "fail");
}

#[actix_web::test]
async fn version_endpoint_reports_build_metadata() {
    let context = context_with(
        ServiceConfig::default(),
        complete_env(),
        FakeIdentity::default(),
        FakeDatabase::default(),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(context)))
            .configure(configure_routes),
    )
    .await;

    let request = test::TestRequest::get().uri("/version").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}
