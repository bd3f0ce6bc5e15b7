//! Platform environment descriptor registry
//!
//! Static table of every environment key the platform consumes, with its
//! semantic category, required-ness, and an optional format check. Defined
//! once, never mutated; the validator walks it in order.

use url::Url;

/// Well-known environment key names
pub mod keys {
    pub const ENVIRONMENT: &str = "TERRACE_ENV";
    pub const PUBLIC_URL: &str = "TERRACE_PUBLIC_URL";
    pub const AUTH_CLIENT_ID: &str = "TERRACE_AUTH_CLIENT_ID";
    pub const AUTH_TENANT_ID: &str = "TERRACE_AUTH_TENANT_ID";
    pub const AUTH_AUTHORITY_URL: &str = "TERRACE_AUTH_AUTHORITY_URL";
    pub const AUTH_REDIRECT_URL: &str = "TERRACE_AUTH_REDIRECT_URL";
    pub const DATABASE_URL: &str = "TERRACE_DATABASE_URL";
    pub const DATABASE_SERVICE_KEY: &str = "TERRACE_DATABASE_SERVICE_KEY";
    pub const DATABASE_HEALTH_TABLE: &str = "TERRACE_DATABASE_HEALTH_TABLE";
}

/// Semantic category of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyCategory {
    /// General application settings
    General,
    /// Single sign-on / identity provider settings
    IdentityProvider,
    /// Hosted database settings
    Database,
}

/// A format check returns a problem description, or `None` when the
/// value is acceptable
pub type FormatValidator = fn(&str) -> Option<String>;

/// Static metadata about one environment key
#[derive(Debug, Clone, Copy)]
pub struct EnvDescriptor {
    /// Environment variable name
    pub name: &'static str,
    /// Semantic category
    pub category: KeyCategory,
    /// Whether absence is fatal under strict validation
    pub required: bool,
    /// Optional shape check applied when the value is present
    pub format: Option<FormatValidator>,
}

/// Every environment key the platform consumes, in reporting order
pub const REGISTRY: &[EnvDescriptor] = &[
    EnvDescriptor {
        name: keys::ENVIRONMENT,
        category: KeyCategory::General,
        required: false,
        format: Some(environment_format),
    },
    EnvDescriptor {
        name: keys::PUBLIC_URL,
        category: KeyCategory::General,
        required: false,
        format: Some(url_format),
    },
    EnvDescriptor {
        name: keys::AUTH_CLIENT_ID,
        category: KeyCategory::IdentityProvider,
        required: true,
        format: Some(guid_format),
    },
    EnvDescriptor {
        name: keys::AUTH_TENANT_ID,
        category: KeyCategory::IdentityProvider,
        required: true,
        format: Some(guid_format),
    },
    EnvDescriptor {
        name: keys::AUTH_AUTHORITY_URL,
        category: KeyCategory::IdentityProvider,
        required: false,
        format: Some(url_format),
    },
    EnvDescriptor {
        name: keys::AUTH_REDIRECT_URL,
        category: KeyCategory::IdentityProvider,
        required: false,
        format: Some(url_format),
    },
    EnvDescriptor {
        name: keys::DATABASE_URL,
        category: KeyCategory::Database,
        required: true,
        format: Some(url_format),
    },
    EnvDescriptor {
        name: keys::DATABASE_SERVICE_KEY,
        category: KeyCategory::Database,
        required: true,
        format: Some(service_key_format),
    },
    EnvDescriptor {
        name: keys::DATABASE_HEALTH_TABLE,
        category: KeyCategory::Database,
        required: false,
        format: Some(table_name_format),
    },
];

/// Look up a descriptor by key name
pub fn descriptor(name: &str) -> Option<&'static EnvDescriptor> {
    REGISTRY.iter().find(|d| d.name == name)
}

fn url_format(value: &str) -> Option<String> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => None,
        Ok(url) => Some(format!("unexpected URL scheme `{}`", url.scheme())),
        Err(e) => Some(format!("not a valid URL: {e}")),
    }
}

fn guid_format(value: &str) -> Option<String> {
    let well_formed = value.len() == 36
        && value.split('-').map(str::len).eq([8usize, 4, 4, 4, 12])
        && value.chars().all(|c| c == '-' || c.is_ascii_hexdigit());
    if well_formed {
        None
    } else {
        Some("expected a GUID (8-4-4-4-12 hex digits)".to_string())
    }
}

fn service_key_format(value: &str) -> Option<String> {
    if value.starts_with("ey") && value.len() >= 32 {
        None
    } else {
        Some("does not look like a platform service key (expected `ey…`, 32+ chars)".to_string())
    }
}

fn environment_format(value: &str) -> Option<String> {
    match value {
        "development" | "staging" | "production" => None,
        other => Some(format!(
            "unknown environment `{other}` (expected development, staging, or production)"
        )),
    }
}

fn table_name_format(value: &str) -> Option<String> {
    let well_formed = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if well_formed {
        None
    } else {
        Some("expected a lowercase table name (letters, digits, underscores)".to_string())
    }
}
