// ABOUTME: Health check and root endpoints for liveness probes
// ABOUTME: Reports service identity, version, and database reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::server::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health probe response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded")
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Whether the database answered a trivial query
    pub database: bool,
    /// Registered account count, absent when the database is unreachable
    pub registered_users: Option<i64>,
}

/// Root welcome response
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Short description
    pub message: String,
}

/// Health and root routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .route("/", get(Self::root))
            .with_state(resources)
    }

    /// `GET /health` - liveness probe
    async fn health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        let database_ok = resources.database.ping().await.is_ok();
        if !database_ok {
            tracing::warn!("Health check: database unreachable");
        }

        let registered_users = resources.database.user_count().await.ok();

        Json(HealthResponse {
            status: if database_ok { "ok" } else { "degraded" }.to_owned(),
            service: crate::logging::SERVICE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database: database_ok,
            registered_users,
        })
    }

    /// `GET /` - welcome payload
    async fn root() -> Json<WelcomeResponse> {
        Json(WelcomeResponse {
            service: crate::logging::SERVICE_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            message: "Paybot chat backend is running".to_owned(),
        })
    }
}
