// ABOUTME: Server resource bundle and HTTP server composition
// ABOUTME: Builds the axum router, layers CORS and tracing, and serves requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # HTTP Server
//!
//! [`ServerResources`] bundles every shared dependency behind one `Arc`
//! used as axum state. [`HttpServer`] composes the routers and runs the
//! listener.

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::intent::IntentResponder;
use crate::middleware::AuthMiddleware;
use crate::routes::{AuthRoutes, AuthService, ChatbotRoutes, HealthRoutes};
use anyhow::{Context, Result};
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared server dependencies, used as axum state
pub struct ServerResources {
    /// Database connection manager
    pub database: Database,
    /// JWT token manager
    pub auth_manager: Arc<AuthManager>,
    /// Authentication business logic
    pub auth_service: AuthService,
    /// Bearer-token request authentication
    pub auth_middleware: AuthMiddleware,
    /// Intent classification and reply selection
    pub intent_responder: IntentResponder,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundle dependencies into shared resources
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        intent_responder: IntentResponder,
        config: ServerConfig,
    ) -> Self {
        let auth_manager = Arc::new(auth_manager);
        let auth_service = AuthService::new(Arc::clone(&auth_manager), database.clone());
        let auth_middleware = AuthMiddleware::new(
            auth_manager.as_ref().clone(),
            database.clone(),
            config.security.rate_limit.clone(),
        );

        Self {
            database,
            auth_manager,
            auth_service,
            auth_middleware,
            intent_responder,
            config,
        }
    }
}

/// HTTP server over the shared resources
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a server over already-built resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the full application router
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = Self::cors_layer(&self.resources.config.security.cors_origins);

        Router::new()
            .merge(AuthRoutes::routes(Arc::clone(&self.resources)))
            .merge(ChatbotRoutes::routes(Arc::clone(&self.resources)))
            .merge(HealthRoutes::routes(Arc::clone(&self.resources)))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Build the CORS layer from configured origins
    fn cors_layer(origins: &[String]) -> CorsLayer {
        let parsed: Vec<http::HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        if parsed.is_empty() {
            tracing::warn!("No valid CORS origins configured; cross-origin requests will fail");
        }

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
    }

    /// Bind and serve until the listener fails or the task is aborted
    ///
    /// # Errors
    ///
    /// Returns an error if binding the port or serving fails
    pub async fn run(self, port: u16) -> Result<()> {
        let router = self.router();
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP port {port}"))?;

        tracing::info!("HTTP server listening on {}", addr);

        axum::serve(listener, router)
            .await
            .context("HTTP server terminated unexpectedly")?;

        Ok(())
    }
}
