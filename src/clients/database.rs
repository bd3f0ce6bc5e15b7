//! Hosted database capability
//!
//! The platform database is Postgres exposed over a REST gateway; the
//! health query is one bounded read against a known table. Connection
//! pooling and consistency are the hosted service's concern.

use crate::config::descriptors::keys;
use crate::config::{EnvSource, ProbeSettings};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use std::time::Duration;

/// Result of one health query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthQueryStats {
    /// Rows returned by the bounded read
    pub rows: u64,
    /// HTTP status the gateway answered with
    pub http_status: u16,
}

/// Narrow interface over the hosted database
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Whether connection settings are present
    fn is_configured(&self) -> bool;

    /// Execute one minimal read-only query against the health table
    async fn run_health_query(&self) -> Result<HealthQueryStats>;
}

/// Live client for the platform's REST data gateway
pub struct RestDatabaseClient {
    http: reqwest::Client,
    timeout: Duration,
    base_url: Option<String>,
    service_key: Option<String>,
    health_table: String,
}

impl RestDatabaseClient {
    /// Build a client from the platform environment
    pub fn from_source(source: &dyn EnvSource, probes: &ProbeSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: probes.attempt_timeout(),
            base_url: source.get(keys::DATABASE_URL),
            service_key: source.get(keys::DATABASE_SERVICE_KEY),
            health_table: source
                .get(keys::DATABASE_HEALTH_TABLE)
                .unwrap_or_else(|| probes.health_table.clone()),
        }
    }

    fn query_url(&self, base: &str) -> String {
        format!(
            "{}/rest/v1/{}?select=id&limit=1",
            base.trim_end_matches('/'),
            self.health_table
        )
    }
}

#[async_trait]
impl DatabaseGateway for RestDatabaseClient {
    fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.service_key.is_some()
    }

    async fn run_health_query(&self) -> Result<HealthQueryStats> {
        let base = self.base_url.as_ref().ok_or_else(|| {
            ServiceError::Database(format!("{} is not set", keys::DATABASE_URL))
        })?;
        let key = self.service_key.as_ref().ok_or_else(|| {
            ServiceError::Database(format!("{} is not set", keys::DATABASE_SERVICE_KEY))
        })?;

        let response = self
            .http
            .get(self.query_url(base))
            .header("apikey", key)
            .bearer_auth(key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ServiceError::TokenExpired(format!(
                "data gateway rejected the service key (HTTP {status})"
            )));
        }
        if !status.is_success() {
            return Err(ServiceError::Database(format!(
                "health query returned HTTP {status}"
            )));
        }

        let rows: Vec<serde_json::Value> = response.json().await?;
        Ok(HealthQueryStats {
            rows: rows.len() as u64,
            http_status: status.as_u16(),
        })
    }
}
