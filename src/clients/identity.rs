//! Identity provider capability
//!
//! The live implementation fetches the provider's OIDC discovery
//! document; nothing else about the provider is touched here.

use crate::config::descriptors::keys;
use crate::config::{EnvSource, ProbeSettings};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// OIDC discovery document, reduced to the fields the probe reports
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    /// Token issuer
    pub issuer: String,
    /// Authorization endpoint URL
    pub authorization_endpoint: String,
    /// Token endpoint URL
    pub token_endpoint: String,
    /// Key-set URL, when advertised
    #[serde(default)]
    pub jwks_uri: Option<String>,
}

/// Narrow interface over the identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether the provider has the settings it needs to attempt discovery
    fn is_configured(&self) -> bool;

    /// Static shape problem in the local settings, if any; no network IO
    fn local_config_error(&self) -> Option<String>;

    /// Fetch the provider's discovery document
    async fn fetch_discovery_document(&self) -> Result<DiscoveryDocument>;
}

/// Live OIDC client backed by reqwest
pub struct OidcIdentityClient {
    http: reqwest::Client,
    timeout: Duration,
    tenant_id: Option<String>,
    client_id: Option<String>,
    authority_url: Option<String>,
}

impl OidcIdentityClient {
    /// Build a client from the platform environment.
    ///
    /// Absent or malformed settings are carried as-is; the probe decides
    /// how to report them.
    pub fn from_source(source: &dyn EnvSource, probes: &ProbeSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout: probes.attempt_timeout(),
            tenant_id: source.get(keys::AUTH_TENANT_ID),
            client_id: source.get(keys::AUTH_CLIENT_ID),
            authority_url: source.get(keys::AUTH_AUTHORITY_URL),
        }
    }

    /// Discovery endpoint derived from the configured authority, or the
    /// provider's tenant-scoped default
    fn discovery_url(&self) -> Result<Url> {
        let raw = match (&self.authority_url, &self.tenant_id) {
            (Some(authority), _) => format!(
                "{}/.well-known/openid-configuration",
                authority.trim_end_matches('/')
            ),
            (None, Some(tenant)) => format!(
                "https://login.microsoftonline.com/{tenant}/v2.0/.well-known/openid-configuration"
            ),
            (None, None) => {
                return Err(ServiceError::Identity(
                    "no authority URL or tenant configured".to_string(),
                ));
            }
        };
        Url::parse(&raw)
            .map_err(|e| ServiceError::Identity(format!("invalid discovery URL {raw}: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for OidcIdentityClient {
    fn is_configured(&self) -> bool {
        self.client_id.is_some() && (self.tenant_id.is_some() || self.authority_url.is_some())
    }

    fn local_config_error(&self) -> Option<String> {
        if let Some(authority) = &self.authority_url {
            if let Err(e) = Url::parse(authority) {
                return Some(format!("{} is not a valid URL: {e}", keys::AUTH_AUTHORITY_URL));
            }
        }
        if matches!(&self.client_id, Some(id) if id.trim().is_empty()) {
            return Some(format!("{} is set but empty", keys::AUTH_CLIENT_ID));
        }
        if matches!(&self.tenant_id, Some(id) if id.trim().is_empty()) {
            return Some(format!("{} is set but empty", keys::AUTH_TENANT_ID));
        }
        None
    }

    async fn fetch_discovery_document(&self) -> Result<DiscoveryDocument> {
        let url = self.discovery_url()?;
        let response = self.http.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Identity(format!(
                "discovery endpoint returned HTTP {status}"
            )));
        }

        let document = response.json::<DiscoveryDocument>().await?;
        Ok(document)
    }
}
