//! Server bootstrap

use crate::config::ServiceConfig;
use crate::server::HttpServer;
use crate::utils::error::Result;

/// Build and run the HTTP server until it stops
pub async fn run_server(config: ServiceConfig) -> Result<()> {
    HttpServer::new(&config)?.start().await
}
