//! Shared fixtures for integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use terrace_health::clients::{
    DatabaseGateway, DiscoveryDocument, HealthQueryStats, IdentityProvider,
};
use terrace_health::utils::error::{Result, ServiceError};
use terrace_health::{ServiceConfig, ServiceContext};

/// Identity provider double with scriptable behavior
pub struct FakeIdentity {
    pub configured: bool,
    pub config_problem: Option<String>,
    pub failure: Option<String>,
    pub panic_on_fetch: bool,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            configured: true,
            config_problem: None,
            failure: None,
            panic_on_fetch: false,
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn local_config_error(&self) -> Option<String> {
        self.config_problem.clone()
    }

    async fn fetch_discovery_document(&self) -> Result<DiscoveryDocument> {
        if self.panic_on_fetch {
            panic!("fake identity provider asked to panic");
        }
        match &self.failure {
            Some(message) => Err(ServiceError::Identity(message.clone())),
            None => Ok(DiscoveryDocument {
                issuer: "https://login.terrace.example.com/tenant/v2.0".to_string(),
                authorization_endpoint: "https://login.terrace.example.com/authorize".to_string(),
                token_endpoint: "https://login.terrace.example.com/token".to_string(),
                jwks_uri: None,
            }),
        }
    }
}

/// Database double with scriptable behavior
pub struct FakeDatabase {
    pub configured: bool,
    pub failure: Option<String>,
}

impl Default for FakeDatabase {
    fn default() -> Self {
        Self {
            configured: true,
            failure: None,
        }
    }
}

#[async_trait]
impl DatabaseGateway for FakeDatabase {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn run_health_query(&self) -> Result<HealthQueryStats> {
        match &self.failure {
            Some(message) => Err(ServiceError::Database(message.clone())),
            None => Ok(HealthQueryStats {
                rows: 1,
                http_status: 200,
            }),
        }
    }
}

/// A platform environment with every required key set to a well-formed value
pub fn complete_env() -> HashMap<String, String> {
    HashMap::from([
        (
            "TERRACE_AUTH_CLIENT_ID".to_string(),
            "6f9619ff-8b86-d011-b42d-00c04fc964ff".to_string(),
        ),
        (
            "TERRACE_AUTH_TENANT_ID".to_string(),
            "72f988bf-86f1-41af-91ab-2d7cd011db47".to_string(),
        ),
        (
            "TERRACE_DATABASE_URL".to_string(),
            "https://db.terrace.example.com".to_string(),
        ),
        (
            "TERRACE_DATABASE_SERVICE_KEY".to_string(),
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9".to_string(),
        ),
    ])
}

/// Context wired to fakes and an in-memory environment
pub fn context_with(
    config: ServiceConfig,
    env: HashMap<String, String>,
    identity: FakeIdentity,
    database: FakeDatabase,
) -> ServiceContext {
    ServiceContext::new(config, Arc::new(identity), Arc::new(database))
        .with_env_source(Arc::new(env))
}
