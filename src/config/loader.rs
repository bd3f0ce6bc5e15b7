//! Configuration loading
//!
//! Precedence: optional YAML file, then environment variable overrides.

use super::descriptors::keys;
use super::{EnvironmentMode, ServiceConfig};
use crate::utils::error::{Result, ServiceError};
use std::env;
use std::path::Path;
use tracing::{debug, warn};

impl ServiceConfig {
    /// Load configuration with file → environment precedence.
    ///
    /// A missing file is not an error; the service can run entirely from
    /// defaults plus environment variables.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub async fn from_file(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let config: ServiceConfig = serde_yaml::from_str(&content)?;
                debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ServiceError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))),
        }
    }

    /// Apply environment variable overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("TERRACE_HEALTH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("TERRACE_HEALTH_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid port: {e}")))?;
        }
        if let Ok(cors) = env::var("TERRACE_HEALTH_CORS") {
            self.server.cors_enabled = cors
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid CORS flag: {e}")))?;
        }
        if let Ok(mode) = env::var(keys::ENVIRONMENT) {
            self.environment = EnvironmentMode::parse(&mode);
        }
        if let Ok(sso) = env::var("TERRACE_FEATURE_SSO") {
            self.features.sso = sso
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid SSO feature flag: {e}")))?;
        }
        if let Ok(database) = env::var("TERRACE_FEATURE_DATABASE") {
            self.features.database = database
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid database feature flag: {e}")))?;
        }
        if let Ok(timeout) = env::var("TERRACE_PROBE_TIMEOUT_SECS") {
            self.probes.attempt_timeout_secs = timeout
                .parse()
                .map_err(|e| ServiceError::Config(format!("Invalid probe timeout: {e}")))?;
        }
        if let Ok(table) = env::var(keys::DATABASE_HEALTH_TABLE) {
            self.probes.health_table = table;
        }

        debug!("Applied environment overrides");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let config = ServiceConfig::from_file(Path::new("/nonexistent/health.yaml"))
            .await
            .unwrap();
        assert_eq!(config.server.port, 8085);
    }

    #[tokio::test]
    async fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  host: 127.0.0.1\n  port: 9191\nenvironment: staging"
        )
        .unwrap();

        let config = ServiceConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.environment, EnvironmentMode::Staging);
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, mapping").unwrap();

        let result = ServiceConfig::from_file(file.path()).await;
        assert!(matches!(result, Err(ServiceError::Yaml(_))));
    }
}
