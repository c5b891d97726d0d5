// ABOUTME: Main server binary for the Pantry recipe API
// ABOUTME: Loads configuration, initializes logging and storage, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Pantry API Server Binary
//!
//! Starts the recipe-management HTTP API with user authentication and
//! SQLite-backed storage.

use anyhow::Result;
use clap::Parser;
use pantry_api_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{ApiServer, ServerResources},
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pantry-api-server")]
#[command(about = "Pantry API - multi-user recipe, tag, and ingredient management server")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Pantry API server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => secret.clone().into_bytes(),
        None => {
            // Tokens stop validating across restarts without a configured secret
            warn!("JWT_SECRET not set; generating an ephemeral signing secret");
            generate_jwt_secret().to_vec()
        }
    };

    let auth_manager = AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours);

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    ApiServer::new(resources).run(http_port).await
}
