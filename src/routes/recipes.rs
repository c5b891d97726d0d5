// ABOUTME: Route handlers for the recipe REST API
// ABOUTME: Provides owner-scoped CRUD with nested tag and ingredient payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Recipe routes
//!
//! Nested tags and ingredients arrive as `{"name": ...}` objects; each name
//! resolves to the caller's existing entity of that name or creates one.
//! All endpoints require a bearer token.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    database::recipes::{CreateRecipeRequest, UpdateRecipeRequest},
    database::RecipesManager,
    errors::AppError,
    models::Recipe,
    routes::ingredients::IngredientResponse,
    routes::tags::TagResponse,
    routes::authenticate,
    server::ServerResources,
};

/// A nested tag or ingredient reference in a recipe payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedEntityPayload {
    pub name: String,
}

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipePayload {
    pub title: String,
    pub description: Option<String>,
    pub time_minutes: u32,
    pub price: Decimal,
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<NamedEntityPayload>,
    #[serde(default)]
    pub ingredients: Vec<NamedEntityPayload>,
}

impl From<CreateRecipePayload> for CreateRecipeRequest {
    fn from(payload: CreateRecipePayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            time_minutes: payload.time_minutes,
            price: payload.price,
            link: payload.link,
            tags: payload.tags.into_iter().map(|t| t.name).collect(),
            ingredients: payload.ingredients.into_iter().map(|i| i.name).collect(),
        }
    }
}

/// Request body for updating a recipe
///
/// Absent fields keep their current values; a present `tags` or
/// `ingredients` list replaces the full set.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<u32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub tags: Option<Vec<NamedEntityPayload>>,
    pub ingredients: Option<Vec<NamedEntityPayload>>,
}

impl From<UpdateRecipePayload> for UpdateRecipeRequest {
    fn from(payload: UpdateRecipePayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            time_minutes: payload.time_minutes,
            price: payload.price,
            link: payload.link,
            tags: payload
                .tags
                .map(|tags| tags.into_iter().map(|t| t.name).collect()),
            ingredients: payload
                .ingredients
                .map(|ingredients| ingredients.into_iter().map(|i| i.name).collect()),
        }
    }
}

/// Response for a recipe
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    /// Unique identifier
    pub id: String,
    /// Recipe title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Preparation time in minutes
    pub time_minutes: u32,
    /// Price with two decimal places
    pub price: Decimal,
    /// Optional external link
    pub link: Option<String>,
    /// Tags attached to this recipe
    pub tags: Vec<TagResponse>,
    /// Ingredients attached to this recipe
    pub ingredients: Vec<IngredientResponse>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            title: recipe.title,
            description: recipe.description,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: recipe.tags.into_iter().map(Into::into).collect(),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            created_at: recipe.created_at.to_rfc3339(),
            updated_at: recipe.updated_at.to_rfc3339(),
        }
    }
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipe/recipes", get(Self::handle_list))
            .route("/api/recipe/recipes", post(Self::handle_create))
            .route("/api/recipe/recipes/:id", get(Self::handle_get))
            .route("/api/recipe/recipes/:id", patch(Self::handle_update))
            .route("/api/recipe/recipes/:id", put(Self::handle_update))
            .route("/api/recipe/recipes/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> RecipesManager {
        RecipesManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/recipe/recipes - List the caller's recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let recipes = Self::manager(&resources).list(auth.user_id).await?;

        let response: Vec<RecipeResponse> = recipes.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipe/recipes - Create a new recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateRecipePayload>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let request: CreateRecipeRequest = body.into();
        let recipe = Self::manager(&resources)
            .create(auth.user_id, &request)
            .await?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipe/recipes/:id - Get a specific recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let recipe_id = parse_recipe_id(&id)?;

        let recipe = Self::manager(&resources)
            .get(recipe_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH/PUT /api/recipe/recipes/:id - Update a recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdateRecipePayload>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let recipe_id = parse_recipe_id(&id)?;

        let request: UpdateRecipeRequest = body.into();
        let recipe = Self::manager(&resources)
            .update(recipe_id, auth.user_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipe/recipes/:id - Delete a recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let recipe_id = parse_recipe_id(&id)?;

        let deleted = Self::manager(&resources)
            .delete(recipe_id, auth.user_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}

/// Parse a path id, mapping malformed values to 404
fn parse_recipe_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Recipe {id}")))
}
