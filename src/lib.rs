// ABOUTME: Main library entry point for the Pantry recipe API server
// ABOUTME: Exposes user accounts, recipes, tags, and ingredients over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![deny(unsafe_code)]

//! # Pantry API Server
//!
//! A small recipe-management web API with per-user data isolation. Every
//! recipe, tag, and ingredient belongs to exactly one user account, and all
//! reads and writes are scoped to the authenticated caller.
//!
//! ## Features
//!
//! - **User accounts**: registration with email normalization and bcrypt
//!   password hashing, JWT bearer-token login
//! - **Recipes**: CRUD with nested tag/ingredient writes that reuse or
//!   create owner-scoped entities inside a single transaction
//! - **Tags and ingredients**: per-user registries with an `assigned_only`
//!   listing filter restricted to entities referenced by the caller's recipes
//!
//! ## Architecture
//!
//! - **Models**: domain structs shared by the database and HTTP layers
//! - **Database**: SQLite access through sqlx with owner-scoped queries
//! - **Routes**: axum routers per domain, thin handlers over managers
//! - **Auth**: HS256 JWT issuance and validation
//! - **Config**: environment-driven server configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pantry_api_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Pantry API configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT-based authentication and token management
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Database management with per-user data scoping
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Common data models for users, recipes, tags, and ingredients
pub mod models;

/// `HTTP` routes for account management and recipe CRUD
pub mod routes;

/// HTTP server assembly and shared resources
pub mod server;
