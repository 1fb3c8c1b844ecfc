//! ContribAudit web server and REST API.
//!
//! Provides an Axum-based HTTP server with:
//! - The audit endpoint (scan a repository's contributor identities)
//! - The outreach endpoint (templated mail to selected recipients)
//! - A health endpoint

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use contribaudit_core::audit_engine::AuditEngine;
use contribaudit_core::config::AppConfig;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: AppConfig,
    pub audit_engine: AuditEngine,
}

/// The web server.
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let state = Arc::new(AppState {
            audit_engine: AuditEngine::new(),
            config,
        });
        Self { state }
    }

    /// Build the application router. Exposed separately so tests can drive
    /// handlers without binding a socket.
    pub fn router(&self) -> Router {
        // CORS: the API serves a local single-user tool; keep it permissive.
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .merge(api::status::routes())
            .merge(api::audit::routes())
            .merge(api::outreach::routes())
            .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2 MB max request body
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the web server, listening on the given address.
    pub async fn start(self, listen_addr: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = listen_addr.parse()?;
        let app = self.router();

        info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
