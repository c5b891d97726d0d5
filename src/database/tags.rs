// ABOUTME: Database operations for user-owned recipe tags
// ABOUTME: Handles owner-scoped CRUD and the get-or-create resolution used by nested writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::Tag;

/// Tag database operations manager
///
/// Every method takes the caller's user id and only ever touches rows owned
/// by that user.
pub struct TagsManager {
    pool: SqlitePool,
}

impl TagsManager {
    /// Create a new tags manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's tags, ordered by name descending
    ///
    /// With `assigned_only` set, only tags referenced by at least one of the
    /// user's recipes are returned, each exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid, assigned_only: bool) -> AppResult<Vec<Tag>> {
        let query = if assigned_only {
            sqlx::query(
                r"
                SELECT DISTINCT t.id, t.user_id, t.name, t.created_at
                FROM tags t
                JOIN recipe_tags rt ON rt.tag_id = t.id
                WHERE t.user_id = $1
                ORDER BY t.name DESC
                ",
            )
        } else {
            sqlx::query(
                r"
                SELECT id, user_id, name, created_at
                FROM tags
                WHERE user_id = $1
                ORDER BY name DESC
                ",
            )
        };

        let rows = query
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Get a tag by id for a specific user
    ///
    /// Returns `None` when the tag does not exist or belongs to another
    /// user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, tag_id: Uuid, user_id: Uuid) -> AppResult<Option<Tag>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, created_at
            FROM tags
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(tag_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Look up a tag by name for this user, creating it when absent
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or oversized name, or a
    /// database error if the operation fails.
    pub async fn get_or_create(&self, user_id: Uuid, name: &str) -> AppResult<Tag> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        get_or_create_tag(&mut conn, user_id, name).await
    }

    /// Rename a tag
    ///
    /// Returns `None` when the tag does not exist or belongs to another
    /// user.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new name is empty, oversized, or
    /// already taken by another of the user's tags.
    pub async fn update(&self, tag_id: Uuid, user_id: Uuid, name: &str) -> AppResult<Option<Tag>> {
        validate_name(name)?;

        let result = sqlx::query("UPDATE tags SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(name)
            .bind(tag_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::invalid_input(format!("Tag name already in use: {name}"))
                } else {
                    AppError::database(format!("Failed to update tag: {e}"))
                }
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(tag_id, user_id).await
    }

    /// Delete a tag
    ///
    /// Link rows to the user's recipes cascade away; the recipes survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, tag_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(tag_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete tag: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a user's tags
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(&self, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count tags: {e}")))?;

        Ok(count)
    }
}

/// Resolve a tag name to the owner's tag row, inserting it when absent
///
/// Works on a plain connection so recipe writes can call it inside their
/// transaction. Never creates a second row for an existing `(owner, name)`
/// pair.
///
/// # Errors
///
/// Returns a validation error for an empty or oversized name, or a database
/// error if the operation fails.
pub(crate) async fn get_or_create_tag(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    name: &str,
) -> AppResult<Tag> {
    validate_name(name)?;

    if let Some(tag) = find_tag_by_name(conn, user_id, name).await? {
        return Ok(tag);
    }

    sqlx::query(
        r"
        INSERT INTO tags (id, user_id, name, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT(user_id, name) DO NOTHING
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id.to_string())
    .bind(name)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create tag: {e}")))?;

    // ON CONFLICT keeps the first writer's row; read back the canonical one
    find_tag_by_name(conn, user_id, name)
        .await?
        .ok_or_else(|| AppError::internal(format!("Tag missing after insert: {name}")))
}

async fn find_tag_by_name(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    name: &str,
) -> AppResult<Option<Tag>> {
    let row = sqlx::query(
        r"
        SELECT id, user_id, name, created_at
        FROM tags
        WHERE user_id = $1 AND name = $2
        ",
    )
    .bind(user_id.to_string())
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to look up tag: {e}")))?;

    row.as_ref().map(row_to_tag).transpose()
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::invalid_input("Tag name cannot be empty"));
    }
    if name.len() > limits::MAX_NAME_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Tag name must be at most {} characters",
            limits::MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn row_to_tag(row: &SqliteRow) -> AppResult<Tag> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let created_at_str: String = row.get("created_at");

    Ok(Tag {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}
