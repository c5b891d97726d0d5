// ABOUTME: User account route handlers for registration, login, and profile management
// ABOUTME: Provides REST endpoints for creating accounts and issuing JWT bearer tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Account routes for user management
//!
//! This module handles user registration, login, and own-profile reads and
//! updates. Handlers are thin wrappers that delegate business logic to
//! [`AuthService`].

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    constants::{error_messages, limits},
    errors::{AppError, AppResult},
    models::{is_valid_email, normalize_email, User},
    routes::authenticate,
    server::ServerResources,
};

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User info for profile and login responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub jwt_token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// Own-profile update request
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    resources: Arc<ServerResources>,
}

impl AuthService {
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Handle user registration
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad email, weak password, or
    /// already-registered address.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }

        if request.password.len() < limits::MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        let email = normalize_email(&request.email);

        if let Ok(Some(_)) = self.resources.database.get_user_by_email(&email).await {
            return Err(AppError::invalid_input(error_messages::USER_ALREADY_EXISTS));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(email, password_hash, request.display_name);

        let user_id = self
            .resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        tracing::info!("User registered successfully: {} ({})", user.email, user_id);

        Ok(RegisterResponse {
            user_id: user_id.to_string(),
            email: user.email,
            display_name: user.display_name,
        })
    }

    /// Handle user login
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the credentials do not match or
    /// the account is deactivated.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        tracing::info!("User login attempt for email: {}", request.email);

        let email = normalize_email(&request.email);

        let user = self
            .resources
            .database
            .get_user_by_email_required(&email)
            .await
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        // Verify password on a blocking thread; bcrypt is deliberately slow
        let password = request.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        if !user.is_active {
            return Err(AppError::auth_invalid(error_messages::ACCOUNT_DISABLED));
        }

        let jwt_token = self
            .resources
            .auth_manager
            .generate_token(&user)
            .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

        let expires_at =
            Utc::now() + Duration::hours(self.resources.auth_manager.token_expiry_hours());

        if let Err(e) = self.resources.database.update_last_active(user.id).await {
            tracing::warn!("Failed to update last_active for {}: {}", user.id, e);
        }

        tracing::info!("User logged in successfully: {}", user.email);

        Ok(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: user.into(),
        })
    }

    /// Get the caller's own profile
    ///
    /// # Errors
    ///
    /// Returns an error if the account vanished mid-session.
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserInfo> {
        let user = self
            .resources
            .database
            .get_user(user_id)
            .await
            .map_err(|e| AppError::database(format!("Failed to load user {user_id}: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        Ok(user.into())
    }

    /// Apply a partial update to the caller's own profile
    ///
    /// A supplied password is re-validated and re-hashed; a supplied display
    /// name replaces the current one.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a weak password.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<UserInfo> {
        let password_hash = match &request.password {
            Some(password) => {
                if password.len() < limits::MIN_PASSWORD_LENGTH {
                    return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
                }
                Some(
                    bcrypt::hash(password, bcrypt::DEFAULT_COST)
                        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
                )
            }
            None => None,
        };

        let user = self
            .resources
            .database
            .update_user_profile(
                user_id,
                request.display_name.as_deref(),
                password_hash.as_deref(),
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to update user {user_id}: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        Ok(user.into())
    }
}

/// Account routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all account routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/user/create", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/me", get(Self::handle_profile))
            .route("/api/auth/me", patch(Self::handle_update_profile))
            .with_state(resources)
    }

    /// Handle POST /api/user/create - Register a new account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::new(resources);
        let response = service.register(body).await?;

        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login - Issue a JWT for valid credentials
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::new(resources);
        let response = service.login(body).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/auth/me - Return the caller's profile
    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let service = AuthService::new(resources);
        let response = service.profile(auth.user_id).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH /api/auth/me - Update the caller's profile
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let service = AuthService::new(resources);
        let response = service.update_profile(auth.user_id, body).await?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
