//! Platform environment validation
//!
//! Walks the descriptor registry against an injected environment source
//! and classifies every key as present, absent, or malformed. The same
//! pass serves two consumers: the production health endpoint (strict)
//! and the interactive setup flow (lenient), selected by an explicit
//! [`Strictness`] parameter rather than an ambient mode check.

use super::descriptors::{EnvDescriptor, REGISTRY};
use std::collections::HashMap;
use tracing::debug;

/// Injected capability answering "what is the current value of this key"
///
/// Lets the same validator run against process environment variables,
/// a config file, or a test double.
pub trait EnvSource: Send + Sync {
    /// Current value for the key, or `None` when unset
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Validation mode controlling whether missing-required-config is fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Missing required keys are errors; production gating
    Strict,
    /// Missing required keys are downgraded to warnings; setup flows
    /// stay usable with incomplete configuration
    Lenient,
}

/// Severity of one validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from a validation pass
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    /// Severity of the finding
    pub severity: Severity,
    /// The descriptor name or logical area the finding concerns
    pub subject: String,
    /// Human-readable explanation
    pub message: String,
}

/// Aggregate result of one validation pass
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationReport {
    /// True iff no error-severity issues were produced
    pub is_valid: bool,
    /// Error findings, in registry order
    pub errors: Vec<ValidationIssue>,
    /// Warning findings, in registry order
    pub warnings: Vec<ValidationIssue>,
    /// Names of required keys that are absent
    pub missing_required: Vec<String>,
    /// Names of keys that are present
    pub configured: Vec<String>,
}

/// Validate the platform environment against the descriptor registry.
///
/// Malformed-but-present values are warnings, not errors: a custom but
/// still functional value must not block startup, while an entirely
/// absent required key does (under [`Strictness::Strict`]).
pub fn validate(source: &dyn EnvSource, strictness: Strictness) -> ValidationReport {
    validate_against(REGISTRY, source, strictness)
}

fn validate_against(
    registry: &[EnvDescriptor],
    source: &dyn EnvSource,
    strictness: Strictness,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut missing_required = Vec::new();
    let mut configured = Vec::new();

    for descriptor in registry {
        match source.get(descriptor.name) {
            None => {
                if descriptor.required {
                    missing_required.push(descriptor.name.to_string());
                    let issue = ValidationIssue {
                        severity: match strictness {
                            Strictness::Strict => Severity::Error,
                            Strictness::Lenient => Severity::Warning,
                        },
                        subject: descriptor.name.to_string(),
                        message: format!("missing required configuration: {}", descriptor.name),
                    };
                    match strictness {
                        Strictness::Strict => errors.push(issue),
                        Strictness::Lenient => warnings.push(issue),
                    }
                }
                // Absent optional keys disable a feature silently; the
                // relevant probe reports the degradation.
            }
            Some(value) => {
                configured.push(descriptor.name.to_string());
                if let Some(check) = descriptor.format {
                    if let Some(problem) = check(&value) {
                        warnings.push(ValidationIssue {
                            severity: Severity::Warning,
                            subject: descriptor.name.to_string(),
                            message: format!("{}: {}", descriptor.name, problem),
                        });
                    }
                }
            }
        }
    }

    let report = ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        missing_required,
        configured,
    };
    debug!(
        valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Platform environment validated"
    );
    report
}
