// ABOUTME: HTTP server assembly with shared resources and router construction
// ABOUTME: Wires domain routers, middleware layers, and the listen loop together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Server Assembly
//!
//! [`ServerResources`] carries the shared dependencies every route handler
//! needs; [`ApiServer`] merges the per-domain routers and runs the listen
//! loop.

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::routes::{AuthRoutes, HealthRoutes, IngredientRoutes, RecipeRoutes, TagRoutes};

/// Shared resources for all route handlers
pub struct ServerResources {
    /// Database manager
    pub database: Arc<Database>,
    /// JWT authentication manager
    pub auth_manager: Arc<AuthManager>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper `Arc` sharing
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            config,
        }
    }
}

/// The Pantry API HTTP server
pub struct ApiServer {
    resources: Arc<ServerResources>,
}

impl ApiServer {
    /// Create a new server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the complete application router
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .merge(AuthRoutes::routes(self.resources.clone()))
            .merge(RecipeRoutes::routes(self.resources.clone()))
            .merge(TagRoutes::routes(self.resources.clone()))
            .merge(IngredientRoutes::routes(self.resources.clone()))
            .merge(HealthRoutes::routes(self.resources.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server loop
    /// exits abnormally.
    pub async fn run(self, port: u16) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("HTTP server listening on {addr}");

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
