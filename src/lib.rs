//! # Terrace Health
//!
//! Operational health and configuration diagnostics for the Terrace
//! construction-project platform. The platform's runtime dependencies —
//! a hosted Postgres data gateway and an OIDC identity provider — are
//! probed live, and the results reduce to one overall verdict.
//!
//! ## Pieces
//!
//! - **Descriptor registry**: every platform environment key, its
//!   category, required-ness, and format rule
//! - **Validator**: classifies keys as present/absent/malformed under an
//!   explicit strictness mode
//! - **Probes**: tri-state live checks of configuration, identity
//!   provider, and database, each retry-wrapped
//! - **Aggregator**: pure precedence reduction (fail > warn > pass)
//! - **Reporting**: HTTP endpoints for monitors and the setup UI, plus
//!   console text for `healthd check`
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use terrace_health::{HealthService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::load(None).await?;
//!     let service = HealthService::new(config)?;
//!     service.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod clients;
pub mod config;
pub mod context;
pub mod health;
pub mod probes;
pub mod server;
pub mod utils;

// Re-export the main types
pub use config::{
    EnvSource, ProcessEnv, ServiceConfig, Severity, Strictness, ValidationIssue,
    ValidationReport, validate,
};
pub use context::{ServiceContext, run_health_check};
pub use health::{HealthAggregate, HealthMetrics, OverallStatus, aggregate};
pub use probes::{ProbeResult, ProbeStatus};
pub use utils::error::{Result, ServiceError};
pub use utils::retry::{RetryConfig, RetryOutcome, RetryPolicy};

use tracing::info;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// A configured health service ready to run
pub struct HealthService {
    config: ServiceConfig,
    server: server::HttpServer,
}

impl HealthService {
    /// Create a new service instance
    pub fn new(config: ServiceConfig) -> Result<Self> {
        info!("Creating health service");
        let server = server::HttpServer::new(&config)?;
        Ok(Self { config, server })
    }

    /// Service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the HTTP server until it stops
    pub async fn run(self) -> Result<()> {
        info!(
            environment = self.config.environment.as_str(),
            "Starting Terrace health service"
        );
        self.server.start().await
    }
}
