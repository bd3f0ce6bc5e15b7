//! Error types for the health service

use thiserror::Error;

/// Result type alias for the health service
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the health service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity provider errors
    #[error("Identity provider error: {0}")]
    Identity(String),

    /// Expired credential errors
    #[error("Token expired: {0}")]
    TokenExpired(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// Timeout errors
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classification used by the retry presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient network conditions worth retrying
    NetworkTransient,
    /// An expired credential that a refresh may repair
    AuthExpired,
    /// Everything else; retrying will not help
    Permanent,
}

impl ServiceError {
    /// Classify this error for retry purposes
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::HttpClient(e) if e.is_timeout() || e.is_connect() => {
                ErrorClass::NetworkTransient
            }
            ServiceError::Timeout(_) => ErrorClass::NetworkTransient,
            ServiceError::TokenExpired(_) => ErrorClass::AuthExpired,
            _ => ErrorClass::Permanent,
        }
    }

    /// Whether this error is a transient network condition
    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::NetworkTransient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_transient() {
        let error = ServiceError::Timeout("probe exceeded 5s".to_string());
        assert_eq!(error.class(), ErrorClass::NetworkTransient);
        assert!(error.is_transient());
    }

    #[test]
    fn test_token_expired_classification() {
        let error = ServiceError::TokenExpired("access token expired".to_string());
        assert_eq!(error.class(), ErrorClass::AuthExpired);
        assert!(!error.is_transient());
    }

    #[test]
    fn test_config_error_is_permanent() {
        let error = ServiceError::Config("missing TERRACE_DATABASE_URL".to_string());
        assert_eq!(error.class(), ErrorClass::Permanent);
    }

    #[test]
    fn test_error_display() {
        let error = ServiceError::Database("health query returned HTTP 500".to_string());
        assert_eq!(
            error.to_string(),
            "Database error: health query returned HTTP 500"
        );
    }
}
