// ABOUTME: Health check route handlers for liveness monitoring
// ABOUTME: Reports service status and database connectivity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Health check routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{constants::service_names, errors::AppError, server::ServerResources};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Health check route handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /api/health - Liveness plus a database ping
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let database_ok = sqlx::query("SELECT 1")
            .execute(resources.database.pool())
            .await
            .is_ok();

        let (status_code, status, database) = if database_ok {
            (StatusCode::OK, "ok", "connected")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        };

        let response = HealthResponse {
            status,
            service: service_names::API_SERVER,
            version: env!("CARGO_PKG_VERSION"),
            database,
            timestamp: Utc::now().to_rfc3339(),
        };

        Ok((status_code, Json(response)).into_response())
    }
}
