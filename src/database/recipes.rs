// ABOUTME: Database operations for user-owned recipes
// ABOUTME: Handles transactional CRUD with nested tag and ingredient resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use super::ingredients::get_or_create_ingredient;
use super::tags::get_or_create_tag;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, Recipe, Tag};

/// Request to create a new recipe
///
/// Tag and ingredient entries are plain names; each resolves to the owner's
/// existing entity of that name or creates one.
#[derive(Debug, Clone)]
pub struct CreateRecipeRequest {
    /// Recipe title
    pub title: String,
    /// Free-form description (defaults to empty)
    pub description: Option<String>,
    /// Preparation time in minutes
    pub time_minutes: u32,
    /// Price, normalized to two decimal places
    pub price: Decimal,
    /// Optional external link
    pub link: Option<String>,
    /// Nested tag names
    pub tags: Vec<String>,
    /// Nested ingredient names
    pub ingredients: Vec<String>,
}

/// Request to update an existing recipe
///
/// Absent fields keep their current values. When `tags` or `ingredients`
/// is present the full link set is replaced, with the same get-or-create
/// resolution as on create; an empty list clears the set.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecipeRequest {
    /// New title (if provided)
    pub title: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New preparation time (if provided)
    pub time_minutes: Option<u32>,
    /// New price (if provided)
    pub price: Option<Decimal>,
    /// New link (if provided)
    pub link: Option<String>,
    /// Replacement tag names (if provided)
    pub tags: Option<Vec<String>>,
    /// Replacement ingredient names (if provided)
    pub ingredients: Option<Vec<String>>,
}

/// Recipe database operations manager
///
/// Every method is scoped to the calling user's rows; nested writes run in
/// one transaction so a failure cannot leave an orphaned recipe.
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new recipe with its nested tags and ingredients
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty title, negative price, or
    /// invalid nested name, and a database error if any statement fails.
    pub async fn create(&self, user_id: Uuid, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        validate_title(&request.title)?;
        let price = normalize_price(request.price)?;

        let now = Utc::now();
        let id = Uuid::new_v4();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO recipes (
                id, user_id, title, description, time_minutes,
                price, link, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&request.title)
        .bind(request.description.as_deref().unwrap_or(""))
        .bind(i64::from(request.time_minutes))
        .bind(price.to_string())
        .bind(&request.link)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        link_tags(&mut tx, id, user_id, &request.tags).await?;
        link_ingredients(&mut tx, id, user_id, &request.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        self.get(id, user_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Recipe missing after create: {id}")))
    }

    /// Get a recipe by id for a specific user, with tags and ingredients
    ///
    /// Returns `None` when the recipe does not exist or belongs to another
    /// user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, title, description, time_minutes,
                   price, link, created_at, updated_at
            FROM recipes
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(recipe_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut recipe = row_to_recipe(&row)?;
        recipe.tags = self.tags_for(recipe_id).await?;
        recipe.ingredients = self.ingredients_for(recipe_id).await?;

        Ok(Some(recipe))
    }

    /// List a user's recipes, newest first, with tags and ingredients
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, title, description, time_minutes,
                   price, link, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let mut recipes = rows
            .iter()
            .map(row_to_recipe)
            .collect::<AppResult<Vec<_>>>()?;

        let mut tag_links = self.tag_links_for_user(user_id).await?;
        let mut ingredient_links = self.ingredient_links_for_user(user_id).await?;

        for recipe in &mut recipes {
            recipe.tags = tag_links.remove(&recipe.id).unwrap_or_default();
            recipe.ingredients = ingredient_links.remove(&recipe.id).unwrap_or_default();
        }

        Ok(recipes)
    }

    /// Apply a partial update to a recipe
    ///
    /// Returns `None` when the recipe does not exist or belongs to another
    /// user.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty title, negative price, or
    /// invalid nested name, and a database error if any statement fails.
    pub async fn update(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        let existing = self.get(recipe_id, user_id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let title = request.title.as_ref().unwrap_or(&existing.title);
        validate_title(title)?;
        let description = request
            .description
            .as_ref()
            .unwrap_or(&existing.description);
        let time_minutes = request.time_minutes.unwrap_or(existing.time_minutes);
        let price = normalize_price(request.price.unwrap_or(existing.price))?;
        let link = request.link.clone().or(existing.link);
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            UPDATE recipes SET
                title = $1, description = $2, time_minutes = $3,
                price = $4, link = $5, updated_at = $6
            WHERE id = $7 AND user_id = $8
            ",
        )
        .bind(title)
        .bind(description)
        .bind(i64::from(time_minutes))
        .bind(price.to_string())
        .bind(&link)
        .bind(now.to_rfc3339())
        .bind(recipe_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if let Some(names) = &request.tags {
            sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
                .bind(recipe_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;

            link_tags(&mut tx, recipe_id, user_id, names).await?;
        }

        if let Some(names) = &request.ingredients {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
                .bind(recipe_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to clear recipe ingredients: {e}"))
                })?;

            link_ingredients(&mut tx, recipe_id, user_id, names).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;

        self.get(recipe_id, user_id).await
    }

    /// Delete a recipe
    ///
    /// Link rows cascade away; tags and ingredients survive for reuse by
    /// the user's other recipes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(recipe_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count a user's recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(&self, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        Ok(count)
    }

    async fn tags_for(&self, recipe_id: Uuid) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query(
            r"
            SELECT t.id, t.user_id, t.name, t.created_at
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = $1
            ORDER BY t.name
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe tags: {e}")))?;

        rows.iter().map(row_to_linked_tag).collect()
    }

    async fn ingredients_for(&self, recipe_id: Uuid) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.user_id, i.name, i.created_at
            FROM ingredients i
            JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = $1
            ORDER BY i.name
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load recipe ingredients: {e}")))?;

        rows.iter().map(row_to_linked_ingredient).collect()
    }

    async fn tag_links_for_user(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, Vec<Tag>>> {
        let rows = sqlx::query(
            r"
            SELECT rt.recipe_id AS recipe_id, t.id, t.user_id, t.name, t.created_at
            FROM tags t
            JOIN recipe_tags rt ON rt.tag_id = t.id
            JOIN recipes r ON r.id = rt.recipe_id
            WHERE r.user_id = $1
            ORDER BY t.name
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load tag links: {e}")))?;

        let mut links: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in &rows {
            let recipe_id_str: String = row.get("recipe_id");
            let recipe_id = Uuid::parse_str(&recipe_id_str)
                .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?;
            links.entry(recipe_id).or_default().push(row_to_linked_tag(row)?);
        }

        Ok(links)
    }

    async fn ingredient_links_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<HashMap<Uuid, Vec<Ingredient>>> {
        let rows = sqlx::query(
            r"
            SELECT ri.recipe_id AS recipe_id, i.id, i.user_id, i.name, i.created_at
            FROM ingredients i
            JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
            JOIN recipes r ON r.id = ri.recipe_id
            WHERE r.user_id = $1
            ORDER BY i.name
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load ingredient links: {e}")))?;

        let mut links: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
        for row in &rows {
            let recipe_id_str: String = row.get("recipe_id");
            let recipe_id = Uuid::parse_str(&recipe_id_str)
                .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?;
            links
                .entry(recipe_id)
                .or_default()
                .push(row_to_linked_ingredient(row)?);
        }

        Ok(links)
    }
}

/// Resolve and link nested tag names to a recipe
///
/// Duplicate names in the payload link once.
async fn link_tags(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
    user_id: Uuid,
    names: &[String],
) -> AppResult<()> {
    for name in names {
        let tag = get_or_create_tag(conn, user_id, name).await?;

        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id.to_string())
            .bind(tag.id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to link tag: {e}")))?;
    }

    Ok(())
}

/// Resolve and link nested ingredient names to a recipe
async fn link_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: Uuid,
    user_id: Uuid,
    names: &[String],
) -> AppResult<()> {
    for name in names {
        let ingredient = get_or_create_ingredient(conn, user_id, name).await?;

        sqlx::query(
            "INSERT OR IGNORE INTO recipe_ingredients (recipe_id, ingredient_id) VALUES ($1, $2)",
        )
        .bind(recipe_id.to_string())
        .bind(ingredient.id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to link ingredient: {e}")))?;
    }

    Ok(())
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.is_empty() {
        return Err(AppError::invalid_input("Recipe title cannot be empty"));
    }
    if title.len() > limits::MAX_TITLE_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Recipe title must be at most {} characters",
            limits::MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

/// Normalize a price to exactly two decimal places
fn normalize_price(price: Decimal) -> AppResult<Decimal> {
    if price.is_sign_negative() {
        return Err(AppError::invalid_input("Recipe price cannot be negative"));
    }
    let mut normalized = price.round_dp(2);
    normalized.rescale(2);
    Ok(normalized)
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let price_str: String = row.get("price");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");
    let time_minutes: i64 = row.get("time_minutes");

    Ok(Recipe {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        title: row.get("title"),
        description: row.get("description"),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        time_minutes: time_minutes as u32,
        price: Decimal::from_str(&price_str)
            .map_err(|e| AppError::internal(format!("Invalid price: {e}")))?,
        link: row.get("link"),
        tags: Vec::new(),
        ingredients: Vec::new(),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

fn row_to_linked_tag(row: &SqliteRow) -> AppResult<Tag> {
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

fn row_to_linked_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price_rescales() {
        let price = normalize_price(Decimal::from_str("5.5").unwrap()).unwrap();
        assert_eq!(price.to_string(), "5.50");

        let price = normalize_price(Decimal::from_str("5.999").unwrap()).unwrap();
        assert_eq!(price.to_string(), "6.00");
    }

    #[test]
    fn test_normalize_price_rejects_negative() {
        assert!(normalize_price(Decimal::from_str("-1.00").unwrap()).is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Sample recipe").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(300)).is_err());
    }
}
