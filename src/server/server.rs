//! HTTP server core implementation

use crate::clients::{OidcIdentityClient, RestDatabaseClient};
use crate::config::{ProcessEnv, ServerSettings, ServiceConfig};
use crate::context::ServiceContext;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer as ActixHttpServer, web};
use std::sync::Arc;
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server settings
    config: ServerSettings,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with live capability clients built from
    /// the process environment
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        info!("Creating HTTP server");

        let env = ProcessEnv;
        let identity = OidcIdentityClient::from_source(&env, &config.probes);
        let database = RestDatabaseClient::from_source(&env, &config.probes);
        let context =
            ServiceContext::new(config.clone(), Arc::new(identity), Arc::new(database));

        Ok(Self {
            config: config.server.clone(),
            state: AppState::new(context),
        })
    }

    /// Create a server around an already-built context (tests, embedding)
    pub fn with_context(context: ServiceContext) -> Self {
        Self {
            config: context.config.server.clone(),
            state: AppState::new(context),
        }
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let cors_enabled = self.config.cors_enabled;

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || {
            let cors = if cors_enabled {
                // The setup UI runs on its own origin during onboarding
                Cors::permissive()
            } else {
                Cors::default()
            };

            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .wrap(Logger::default())
                .wrap(DefaultHeaders::new().add(("Server", "terrace-health")))
                .configure(routes::health::configure_routes)
        })
        .bind(&bind_addr)
        .map_err(|e| ServiceError::Config(format!("Failed to bind {bind_addr}: {e}")))?
        .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| ServiceError::Internal(format!("Server error: {e}")))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server settings
    pub fn config(&self) -> &ServerSettings {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
