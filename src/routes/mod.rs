// ABOUTME: Route module organization for the Pantry API HTTP endpoints
// ABOUTME: Provides per-domain route definitions and the shared bearer-token authentication step
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Route modules for the Pantry API server
//!
//! Each domain module contains its route definitions, serde payload types,
//! and thin handler functions that delegate to the database managers. All
//! data endpoints authenticate the caller here first; handlers only ever
//! see a resolved user id.

/// Account registration, login, and profile routes
pub mod auth;
/// Health check routes
pub mod health;
/// Ingredient listing and management routes
pub mod ingredients;
/// Recipe CRUD routes
pub mod recipes;
/// Tag listing and management routes
pub mod tags;

pub use auth::{AuthRoutes, AuthService, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UserInfo};
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use tags::TagRoutes;

use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User id from the validated token
    pub user_id: Uuid,
    /// Email of the account
    pub email: String,
}

/// Authenticate a request from its `Authorization` header
///
/// Validates the bearer token and re-checks the account against the
/// database so revoked or deactivated users are rejected even with a
/// still-valid token.
///
/// # Errors
///
/// Returns `AuthRequired` when the header is missing and `AuthInvalid`/
/// `AuthExpired` when the token or account does not check out.
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<AuthenticatedUser> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(AppError::auth_required)?;

    let claims = resources.auth_manager.validate_bearer(auth_header)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| AppError::auth_invalid(format!("Invalid user id in token: {e}")))?;

    let user = resources
        .database
        .get_user(user_id)
        .await
        .map_err(|e| AppError::database(format!("Failed to load user {user_id}: {e}")))?
        .ok_or_else(|| AppError::auth_invalid("Unknown user"))?;

    if !user.is_active {
        return Err(AppError::auth_invalid("Account is deactivated"));
    }

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
    })
}
