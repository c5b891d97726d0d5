// ABOUTME: Database operations for user-owned recipe ingredients
// ABOUTME: Handles owner-scoped CRUD and the get-or-create resolution used by nested writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::tags::is_unique_violation;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::Ingredient;

/// Ingredient database operations manager
///
/// Mirrors [`super::TagsManager`]: every method is scoped to the calling
/// user's rows.
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's ingredients, ordered by name descending
    ///
    /// With `assigned_only` set, only ingredients referenced by at least one
    /// of the user's recipes are returned, each exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid, assigned_only: bool) -> AppResult<Vec<Ingredient>> {
        let query = if assigned_only {
            sqlx::query(
                r"
                SELECT DISTINCT i.id, i.user_id, i.name, i.created_at
                FROM ingredients i
                JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
                WHERE i.user_id = $1
                ORDER BY i.name DESC
                ",
            )
        } else {
            sqlx::query(
                r"
                SELECT id, user_id, name, created_at
                FROM ingredients
                WHERE user_id = $1
                ORDER BY name DESC
                ",
            )
        };

        let rows = query
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Get an ingredient by id for a specific user
    ///
    /// Returns `None` when the ingredient does not exist or belongs to
    /// another user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, ingredient_id: Uuid, user_id: Uuid) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, created_at
            FROM ingredients
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(ingredient_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.as_ref().map(row_to_ingredient).transpose()
    }

    /// Look up an ingredient by name for this user, creating it when absent
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or oversized name, or a
    /// database error if the operation fails.
    pub async fn get_or_create(&self, user_id: Uuid, name: &str) -> AppResult<Ingredient> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        get_or_create_ingredient(&mut conn, user_id, name).await
    }

    /// Rename an ingredient
    ///
    /// Returns `None` when the ingredient does not exist or belongs to
    /// another user.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new name is empty, oversized, or
    /// already taken by another of the user's ingredients.
    pub async fn update(
        &self,
        ingredient_id: Uuid,
        user_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Ingredient>> {
        validate_name(name)?;

        let result =
            sqlx::query("UPDATE ingredients SET name = $1 WHERE id = $2 AND user_id = $3")
                .bind(name)
                .bind(ingredient_id.to_string())
                .bind(user_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::invalid_input(format!("Ingredient name already in use: {name}"))
                    } else {
                        AppError::database(format!("Failed to update ingredient: {e}"))
                    }
                })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(ingredient_id, user_id).await
    }

    /// Delete an ingredient
    ///
    /// Link rows to the user's recipes cascade away; the recipes survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, ingredient_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1 AND user_id = $2")
            .bind(ingredient_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a user's ingredients
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(&self, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count ingredients: {e}")))?;

        Ok(count)
    }
}

/// Resolve an ingredient name to the owner's row, inserting it when absent
///
/// The transaction-friendly counterpart of
/// [`super::tags::get_or_create_tag`], used by recipe create and update.
///
/// # Errors
///
/// Returns a validation error for an empty or oversized name, or a database
/// error if the operation fails.
pub(crate) async fn get_or_create_ingredient(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    name: &str,
) -> AppResult<Ingredient> {
    validate_name(name)?;

    if let Some(ingredient) = find_ingredient_by_name(conn, user_id, name).await? {
        return Ok(ingredient);
    }

    sqlx::query(
        r"
        INSERT INTO ingredients (id, user_id, name, created_at)
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
    .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

    find_ingredient_by_name(conn, user_id, name)
        .await?
        .ok_or_else(|| AppError::internal(format!("Ingredient missing after insert: {name}")))
}

async fn find_ingredient_by_name(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    name: &str,
) -> AppResult<Option<Ingredient>> {
    let row = sqlx::query(
        r"
        SELECT id, user_id, name, created_at
        FROM ingredients
        WHERE user_id = $1 AND name = $2
        ",
    )
    .bind(user_id.to_string())
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to look up ingredient: {e}")))?;

    row.as_ref().map(row_to_ingredient).transpose()
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::invalid_input("Ingredient name cannot be empty"));
    }
    if name.len() > limits::MAX_NAME_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Ingredient name must be at most {} characters",
            limits::MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let created_at_str: String = row.get("created_at");

    Ok(Ingredient {
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
