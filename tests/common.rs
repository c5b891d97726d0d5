// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, resource, and request-building helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs
#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

//! Shared test utilities for `pantry_api_server`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use pantry_api_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::Database,
    models::User,
    server::{ApiServer, ServerResources},
};
use serde_json::Value;
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup (fresh in-memory SQLite)
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(generate_jwt_secret().to_vec(), 24)
}

/// Standard test resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    let auth_manager = create_test_auth_manager();
    let config = Arc::new(ServerConfig::from_env()?);
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        config,
    )))
}

/// Build the full application router over the given resources
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    ApiServer::new(resources.clone()).router()
}

/// Create a standard test user
pub async fn create_test_user(database: &Database) -> Result<(Uuid, User)> {
    create_test_user_with_email(database, "test@example.com").await
}

/// Create a test user with custom email
pub async fn create_test_user_with_email(
    database: &Database,
    email: &str,
) -> Result<(Uuid, User)> {
    let user = User::new(
        email.to_string(),
        "test_hash".to_string(),
        Some("Test User".to_string()),
    );
    let user_id = user.id;

    database.create_user(&user).await?;
    Ok((user_id, user))
}

/// Generate a bearer header value for a user
pub fn bearer_for(resources: &Arc<ServerResources>, user: &User) -> String {
    let token = resources.auth_manager.generate_token(user).unwrap();
    format!("Bearer {token}")
}

/// Build a JSON request with an optional bearer token
pub fn json_request(
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, bearer);
    }

    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(value).unwrap()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// Read a response body as JSON
pub async fn response_json(response: Response<axum::body::Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
