// ABOUTME: Configuration module organization for the Pantry API server
// ABOUTME: Re-exports environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Configuration management for deployment-specific settings

/// Environment-based server configuration
pub mod environment;

pub use environment::ServerConfig;
