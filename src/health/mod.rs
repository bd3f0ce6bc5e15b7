//! Health aggregation and reporting
//!
//! Reduces probe results into one overall verdict and renders it for
//! machines (HTTP payload) and humans (setup console).

pub mod aggregate;
pub mod report;

pub use aggregate::{HealthAggregate, HealthMetrics, OverallStatus, aggregate};
pub use report::{render_report, render_validation};
