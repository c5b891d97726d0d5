// ABOUTME: Application constants and configuration values organized by domain
// ABOUTME: Centralizes limits, error messages, and service names used across modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Application-wide constants organized by domain

/// Size and time limits enforced by validation and configuration
pub mod limits {
    /// Minimum accepted password length for registration and profile updates
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Maximum accepted email length (RFC 5321)
    pub const MAX_EMAIL_LENGTH: usize = 254;

    /// Maximum length of a recipe title
    pub const MAX_TITLE_LENGTH: usize = 255;

    /// Maximum length of a tag or ingredient name
    pub const MAX_NAME_LENGTH: usize = 255;

    /// Default JWT lifetime in hours
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

    /// Default HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// User-facing error message fragments
pub mod error_messages {
    /// Registration email failed validation
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

    /// Registration password below the minimum length
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";

    /// Registration email already belongs to an account
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";

    /// Login credentials did not match
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

    /// Login attempted on a deactivated account
    pub const ACCOUNT_DISABLED: &str = "This account has been deactivated";
}

/// Service identifiers for logging and diagnostics
pub mod service_names {
    /// Main API server binary
    pub const API_SERVER: &str = "pantry-api-server";
}

/// Environment variable names read by configuration
pub mod env_vars {
    /// HTTP listen port override
    pub const HTTP_PORT: &str = "HTTP_PORT";

    /// SQLite database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";

    /// HS256 signing secret for JWTs
    pub const JWT_SECRET: &str = "JWT_SECRET";

    /// JWT lifetime override in hours
    pub const JWT_EXPIRY_HOURS: &str = "JWT_EXPIRY_HOURS";

    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}
