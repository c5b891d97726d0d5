// ABOUTME: Database management for the Pantry API server
// ABOUTME: Owns the SQLite pool, schema migrations, and module organization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! # Database Management
//!
//! This module provides database functionality for the Pantry API server.
//! It owns the SQLite connection pool and runs the schema migrations for
//! users, tags, ingredients, and recipes. Per-entity operations live in the
//! domain submodules; every query that touches user data is scoped by the
//! owning user's id.

pub mod ingredients;
pub mod recipes;
pub mod tags;
mod users;

pub use ingredients::IngredientsManager;
pub use recipes::RecipesManager;
pub use tags::TagsManager;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;

/// Database manager for user, recipe, tag, and ingredient storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // A pooled `:memory:` database opens a fresh empty store per
        // connection; pin those to a single long-lived connection.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(10)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };

        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        // Order matters: tags, ingredients, and recipes reference users,
        // and the link tables reference recipes.
        self.migrate_users().await?;
        self.migrate_tags().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;

        Ok(())
    }

    async fn migrate_tags(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tags_user_id ON tags(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn migrate_ingredients(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_user_id ON ingredients(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                time_minutes INTEGER NOT NULL CHECK (time_minutes >= 0),
                price TEXT NOT NULL,
                link TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user_id ON recipes(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id TEXT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, ingredient_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
