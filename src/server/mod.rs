//! HTTP server
//!
//! The reporting surface: the aggregate health endpoint for load
//! balancers, plus per-probe endpoints for the interactive setup flow.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;

pub use builder::run_server;
pub use server::HttpServer;
pub use state::AppState;
