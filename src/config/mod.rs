//! Service configuration
//!
//! Settings for the health service itself: HTTP server, deployment
//! environment, feature flags, and probe tuning. Distinct from the
//! *platform environment* the service validates (see [`descriptors`]).

pub mod descriptors;
pub mod loader;
pub mod validation;

pub use descriptors::{EnvDescriptor, KeyCategory, REGISTRY};
pub use validation::{
    EnvSource, ProcessEnv, Severity, Strictness, ValidationIssue, ValidationReport, validate,
};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Deployment environment mode
    #[serde(default)]
    pub environment: EnvironmentMode,
    /// Feature toggles for optional integrations
    #[serde(default)]
    pub features: FeatureFlags,
    /// Probe tuning
    #[serde(default)]
    pub probes: ProbeSettings,
}

impl ServiceConfig {
    /// Validation strictness implied by the deployment environment
    pub fn strictness(&self) -> Strictness {
        self.environment.strictness()
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to allow cross-origin requests from the setup UI
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
        }
    }
}

/// Deployment environment mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    #[default]
    Development,
    Staging,
    Production,
}

impl EnvironmentMode {
    /// Parse a mode name; unknown names fall back to development
    pub fn parse(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            "staging" => Self::Staging,
            _ => Self::Development,
        }
    }

    /// Strictness implied by this mode: only production gates hard on
    /// missing required configuration
    pub fn strictness(&self) -> Strictness {
        match self {
            Self::Production => Strictness::Strict,
            Self::Development | Self::Staging => Strictness::Lenient,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Feature toggles for optional integrations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Single sign-on via the identity provider
    #[serde(default = "default_true")]
    pub sso: bool,
    /// Hosted database access
    #[serde(default = "default_true")]
    pub database: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            sso: true,
            database: true,
        }
    }
}

/// Probe tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Per-attempt timeout for network-bound probes, in seconds
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    /// Table the database probe reads from
    #[serde(default = "default_health_table")]
    pub health_table: String,
}

impl ProbeSettings {
    /// Per-attempt timeout as a duration
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout_secs(),
            health_table: default_health_table(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_true() -> bool {
    true
}

fn default_attempt_timeout_secs() -> u64 {
    5
}

fn default_health_table() -> String {
    "projects".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8085);
        assert_eq!(config.environment, EnvironmentMode::Development);
        assert!(config.features.sso);
        assert!(config.features.database);
        assert_eq!(config.probes.attempt_timeout(), Duration::from_secs(5));
        assert_eq!(config.probes.health_table, "projects");
    }

    #[test]
    fn test_strictness_follows_environment() {
        assert_eq!(EnvironmentMode::Production.strictness(), Strictness::Strict);
        assert_eq!(EnvironmentMode::Staging.strictness(), Strictness::Lenient);
        assert_eq!(
            EnvironmentMode::Development.strictness(),
            Strictness::Lenient
        );
    }

    #[test]
    fn test_environment_mode_parse() {
        assert_eq!(EnvironmentMode::parse("production"), EnvironmentMode::Production);
        assert_eq!(EnvironmentMode::parse("staging"), EnvironmentMode::Staging);
        assert_eq!(EnvironmentMode::parse("development"), EnvironmentMode::Development);
        assert_eq!(EnvironmentMode::parse("anything"), EnvironmentMode::Development);
    }

    #[test]
    fn test_yaml_deserialization_with_partial_fields() {
        let yaml = r#"
server:
  port: 9090
environment: production
probes:
  attempt_timeout_secs: 2
"#;
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.environment, EnvironmentMode::Production);
        assert_eq!(config.probes.attempt_timeout_secs, 2);
        assert_eq!(config.probes.health_table, "projects");
        assert!(config.features.sso);
    }
}
