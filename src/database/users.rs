// ABOUTME: User management database operations
// ABOUTME: Handles user persistence, lookup, and profile updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::Database;
use crate::models::User;

impl Database {
    /// Create the users table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_staff BOOLEAN NOT NULL DEFAULT 0,
                is_superuser BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Persist a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(anyhow!("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, email, display_name, password_hash,
                is_active, is_staff, is_superuser, created_at, last_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(user.created_at.to_rfc3339())
        .bind(user.last_active.to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(user.id)
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, password_hash,
                   is_active, is_staff, is_superuser, created_at, last_active
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, email, display_name, password_hash,
                   is_active, is_staff, is_superuser, created_at, last_active
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email, failing when absent
    ///
    /// # Errors
    ///
    /// Returns an error if no user has this email or the query fails.
    pub async fn get_user_by_email_required(&self, email: &str) -> Result<User> {
        self.get_user_by_email(email)
            .await?
            .ok_or_else(|| anyhow!("User not found: {email}"))
    }

    /// Update a user's display name and/or password hash
    ///
    /// Absent fields keep their current values.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                display_name = COALESCE($1, display_name),
                password_hash = COALESCE($2, password_hash)
            WHERE id = $3
            ",
        )
        .bind(display_name)
        .bind(password_hash)
        .bind(user_id.to_string())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_user(user_id).await
    }

    /// Record account activity
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn update_last_active(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_active = $1 WHERE id = $2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Delete a user account
    ///
    /// Owned recipes, tags, and ingredients cascade away with the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");
    let last_active_str: String = row.get("last_active");
    let is_active: i64 = row.get("is_active");
    let is_staff: i64 = row.get("is_staff");
    let is_superuser: i64 = row.get("is_superuser");

    Ok(User {
        id: Uuid::parse_str(&id_str)?,
        email: row.get("email"),
        display_name: row.get("display_name"),
        password_hash: row.get("password_hash"),
        is_active: is_active == 1,
        is_staff: is_staff == 1,
        is_superuser: is_superuser == 1,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc),
        last_active: DateTime::parse_from_rfc3339(&last_active_str)?.with_timezone(&Utc),
    })
}
