//! Service context
//!
//! Explicitly constructed, dependency-injected bundle of everything the
//! validator and probes consume: configuration, the process-start
//! instant, the environment source, and the two capability clients.
//! Nothing in the checking path reads ambient module state.

use crate::clients::{DatabaseGateway, IdentityProvider};
use crate::config::validation::{EnvSource, ProcessEnv};
use crate::config::ServiceConfig;
use crate::health::{HealthAggregate, aggregate};
use crate::probes::{ProbeResult, checks};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed check names in the aggregate's `checks` map
pub mod check_names {
    pub const CONFIGURATION: &str = "configuration";
    pub const IDENTITY_PROVIDER: &str = "identity-provider";
    pub const DATABASE: &str = "database";
}

/// Shared, read-only context for one running service instance
pub struct ServiceContext {
    /// Service configuration
    pub config: ServiceConfig,
    /// Platform environment under validation
    pub env: Arc<dyn EnvSource>,
    /// Identity provider capability
    pub identity: Arc<dyn IdentityProvider>,
    /// Hosted database capability
    pub database: Arc<dyn DatabaseGateway>,
    /// Written once at construction, read thereafter
    started_at: Instant,
}

impl ServiceContext {
    /// Create a context reading the process environment
    pub fn new(
        config: ServiceConfig,
        identity: Arc<dyn IdentityProvider>,
        database: Arc<dyn DatabaseGateway>,
    ) -> Self {
        Self {
            config,
            env: Arc::new(ProcessEnv),
            identity,
            database,
            started_at: Instant::now(),
        }
    }

    /// Replace the environment source (test doubles, config files)
    pub fn with_env_source(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Replace the process-start instant (fabricated uptimes in tests)
    pub fn with_start_instant(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Time since this context was constructed
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Run every dependency probe and reduce the results.
///
/// Probes fan out concurrently; aggregation waits for all of them. Each
/// invocation re-probes live state, nothing is cached across calls.
pub async fn run_health_check(ctx: &ServiceContext) -> HealthAggregate {
    debug!("Running full health check");
    let started = Instant::now();

    let (configuration, identity, database) = tokio::join!(
        async { checks::configuration_probe(ctx.env.as_ref(), ctx.config.strictness()) },
        checks::identity_probe(ctx),
        checks::database_probe(ctx),
    );

    let mut checks: BTreeMap<String, ProbeResult> = BTreeMap::new();
    checks.insert(check_names::CONFIGURATION.to_string(), configuration);
    checks.insert(check_names::IDENTITY_PROVIDER.to_string(), identity);
    checks.insert(check_names::DATABASE.to_string(), database);

    aggregate(checks, started.elapsed(), ctx.uptime())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{DiscoveryDocument, HealthQueryStats};
    use crate::config::descriptors::keys;
    use crate::health::OverallStatus;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct AlwaysHealthyIdentity;

    #[async_trait]
    impl crate::clients::IdentityProvider for AlwaysHealthyIdentity {
        fn is_configured(&self) -> bool {
            true
        }
        fn local_config_error(&self) -> Option<String> {
            None
        }
        async fn fetch_discovery_document(&self) -> Result<DiscoveryDocument> {
            Ok(DiscoveryDocument {
                issuer: "https://login.terrace.example.com".to_string(),
                authorization_endpoint: "https://login.terrace.example.com/authorize".to_string(),
                token_endpoint: "https://login.terrace.example.com/token".to_string(),
                jwks_uri: None,
            })
        }
    }

    struct AlwaysHealthyDatabase;

    #[async_trait]
    impl crate::clients::DatabaseGateway for AlwaysHealthyDatabase {
        fn is_configured(&self) -> bool {
            true
        }
        async fn run_health_query(&self) -> Result<HealthQueryStats> {
            Ok(HealthQueryStats {
                rows: 1,
                http_status: 200,
            })
        }
    }

    fn complete_env() -> HashMap<String, String> {
        HashMap::from([
            (keys::AUTH_CLIENT_ID.to_string(), "6f9619ff-8b86-d011-b42d-00c04fc964ff".to_string()),
            (keys::AUTH_TENANT_ID.to_string(), "72f988bf-86f1-41af-91ab-2d7cd011db47".to_string()),
            (keys::DATABASE_URL.to_string(), "https://db.terrace.example.com".to_string()),
            (keys::DATABASE_SERVICE_KEY.to_string(), "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_all_healthy_end_to_end() {
        let ctx = ServiceContext::new(
            ServiceConfig::default(),
            Arc::new(AlwaysHealthyIdentity),
            Arc::new(AlwaysHealthyDatabase),
        )
        .with_env_source(Arc::new(complete_env()));

        let aggregate = run_health_check(&ctx).await;
        assert_eq!(aggregate.overall_status, OverallStatus::Healthy);
        assert_eq!(aggregate.checks.len(), 4); // three probes + overall
        assert_eq!(
            aggregate.checks["overall"].message,
            "All systems operational"
        );
    }

    #[tokio::test]
    async fn test_uptime_uses_injected_start_instant() {
        let ctx = ServiceContext::new(
            ServiceConfig::default(),
            Arc::new(AlwaysHealthyIdentity),
            Arc::new(AlwaysHealthyDatabase),
        )
        .with_env_source(Arc::new(complete_env()))
        .with_start_instant(Instant::now() - Duration::from_secs(90));

        let aggregate = run_health_check(&ctx).await;
        assert!(aggregate.metrics.uptime_ms >= 90_000);
    }
}
