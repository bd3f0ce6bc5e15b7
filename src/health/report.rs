//! Console rendering for the setup flow
//!
//! Human-readable text for `healthd check`: per-check lines plus the
//! exact missing-variable names and format warnings, so an operator can
//! remediate without reading source code.

use super::aggregate::{HealthAggregate, OVERALL_CHECK};
use crate::config::ValidationReport;
use std::fmt::Write;

/// Render a health aggregate as console text
pub fn render_report(aggregate: &HealthAggregate) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Overall: {} ({} checks, {} ms)",
        aggregate.overall_status.as_str().to_uppercase(),
        aggregate.checks.len().saturating_sub(1),
        aggregate.metrics.response_time_ms,
    );

    for (name, check) in &aggregate.checks {
        if name == OVERALL_CHECK {
            continue;
        }
        let _ = writeln!(
            out,
            "  [{:<4}] {:<18} {} ({} ms)",
            check.status.as_str(),
            name,
            check.message,
            check.latency_ms,
        );
    }
    out
}

/// Render a validation report as console text
pub fn render_validation(report: &ValidationReport) -> String {
    let mut out = String::new();

    if report.is_valid && report.warnings.is_empty() {
        let _ = writeln!(
            out,
            "Configuration OK ({} keys set)",
            report.configured.len()
        );
        return out;
    }

    if !report.missing_required.is_empty() {
        let _ = writeln!(out, "Missing required settings:");
        for name in &report.missing_required {
            let _ = writeln!(out, "  - {name}");
        }
    }
    for issue in &report.errors {
        let _ = writeln!(out, "  error: {}", issue.message);
    }
    for issue in &report.warnings {
        let _ = writeln!(out, "  warning: {}", issue.message);
    }
    let _ = writeln!(out, "{} keys set", report.configured.len());
    out
}
