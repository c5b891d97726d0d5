// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::constants::{env_vars, limits};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite:data/pantry.db` or `sqlite::memory:`
    pub url: String,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret; generated at startup when absent
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

/// Complete server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable fails to parse (port or
    /// expiry hours that are not numbers).
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var(env_vars::HTTP_PORT) {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("Invalid {}: {value}", env_vars::HTTP_PORT))?,
            Err(_) => limits::DEFAULT_HTTP_PORT,
        };

        let jwt_expiry_hours = match env::var(env_vars::JWT_EXPIRY_HOURS) {
            Ok(value) => value
                .parse::<i64>()
                .with_context(|| format!("Invalid {}: {value}", env_vars::JWT_EXPIRY_HOURS))?,
            Err(_) => limits::DEFAULT_JWT_EXPIRY_HOURS,
        };

        let environment = Environment::from_str_or_default(
            &env::var(env_vars::ENVIRONMENT).unwrap_or_default(),
        );

        let log_level =
            LogLevel::from_str_or_default(&env::var("LOG_LEVEL").unwrap_or_default());

        Ok(Self {
            http_port,
            environment,
            log_level,
            database: DatabaseConfig {
                url: env::var(env_vars::DATABASE_URL)
                    .unwrap_or_else(|_| "sqlite:data/pantry.db".to_owned()),
            },
            auth: AuthConfig {
                jwt_secret: env::var(env_vars::JWT_SECRET).ok(),
                jwt_expiry_hours,
            },
        })
    }

    /// One-line configuration summary for startup logging
    ///
    /// Never includes the JWT secret.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} env={} log={} database={}",
            self.http_port, self.environment, self.log_level, self.database.url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default(""),
            Environment::Development
        );
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
    }
}
