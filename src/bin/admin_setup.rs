// ABOUTME: Administrative setup utility for bootstrapping superuser accounts
// ABOUTME: Command-line interface for creating admin users against the configured database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Admin Setup Utility
//!
//! Creates superuser accounts for the Pantry API server.
//!
//! Usage:
//! ```bash
//! # Create an admin user
//! cargo run --bin admin-setup -- create-admin-user \
//!     --email admin@example.com --password changeme123
//! ```

use anyhow::{anyhow, Result};
use bcrypt::{hash, DEFAULT_COST};
use clap::{Parser, Subcommand};
use pantry_api_server::{
    config::environment::ServerConfig,
    database::Database,
    logging,
    models::{is_valid_email, normalize_email, User},
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "admin-setup",
    about = "Pantry API admin account management",
    long_about = "Bootstrap superuser accounts for the Pantry API server."
)]
struct AdminSetupArgs {
    #[command(subcommand)]
    command: AdminCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create a superuser account
    CreateAdminUser {
        /// Email address for the admin account
        #[arg(long)]
        email: String,

        /// Password for the admin account
        #[arg(long)]
        password: String,

        /// Optional display name
        #[arg(long)]
        display_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = AdminSetupArgs::parse();

    let config = ServerConfig::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database.url);
    let database = Database::new(&database_url).await?;

    match args.command {
        AdminCommand::CreateAdminUser {
            email,
            password,
            display_name,
        } => {
            if !is_valid_email(&email) {
                return Err(anyhow!("Invalid email address: {email}"));
            }

            let password_hash = hash(&password, DEFAULT_COST)?;
            let user = User::new_superuser(normalize_email(&email), password_hash, display_name);

            let user_id = database.create_user(&user).await?;

            info!("Admin user created: {} ({})", user.email, user_id);
        }
    }

    Ok(())
}
