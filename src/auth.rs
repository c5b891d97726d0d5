// ABOUTME: JWT-based user authentication and token management
// ABOUTME: Handles token generation, validation, and bearer-header parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Authentication and Token Management
//!
//! This module provides HS256 JWT issuance and validation for the Pantry
//! API server. Tokens carry the user id and email; every authenticated
//! endpoint validates the bearer token and re-checks the account against
//! the database before serving data.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::User;

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Generate a random secret suitable for HS256 signing
#[must_use]
pub fn generate_jwt_secret() -> [u8; 64] {
    let mut secret = [0u8; 64];
    rand::thread_rng().fill(&mut secret[..]);
    secret
}

/// Manages JWT generation and validation for user sessions
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub const fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
        }
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn token_expiry_hours(&self) -> i64 {
        self.token_expiry_hours
    }

    /// Generate a `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )?;

        Ok(token)
    }

    /// Validate a `JWT` token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for expired tokens and `AuthInvalid` for
    /// malformed or incorrectly signed ones.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth_expired(),
            _ => AppError::auth_invalid(format!("Invalid token: {e}")),
        })?;

        Ok(token_data.claims)
    }

    /// Validate an `Authorization` header value of the form `Bearer <token>`
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the header is not a bearer token, plus
    /// whatever [`Self::validate_token`] reports for the token itself.
    pub fn validate_bearer(&self, auth_header: &str) -> AppResult<Claims> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;

        self.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "test@example.com".to_owned(),
            "hashed_password".to_owned(),
            Some("Test User".to_owned()),
        )
    }

    fn test_manager() -> AuthManager {
        AuthManager::new(generate_jwt_secret().to_vec(), 24)
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = test_manager();
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_token_wrong_secret() {
        let user = test_user();
        let token = test_manager().generate_token(&user).unwrap();

        let other = test_manager();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let manager = AuthManager::new(generate_jwt_secret().to_vec(), -1);
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        let err = manager.validate_token(&token).unwrap_err();

        assert_eq!(err.code, crate::errors::ErrorCode::AuthExpired);
    }

    #[test]
    fn test_validate_bearer_header() {
        let manager = test_manager();
        let user = test_user();
        let token = manager.generate_token(&user).unwrap();

        let claims = manager.validate_bearer(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.email, user.email);

        assert!(manager.validate_bearer(&token).is_err());
        assert!(manager.validate_bearer("Basic dXNlcjpwYXNz").is_err());
    }

    #[test]
    fn test_validate_garbage_token() {
        let manager = test_manager();
        assert!(manager.validate_token("not-a-jwt").is_err());
    }
}
