// ABOUTME: Route handlers for the ingredient REST API
// ABOUTME: Provides owner-scoped listing, renaming, and deletion of recipe ingredients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Ingredient routes
//!
//! Same surface as the tag routes: list, rename, delete, with creation
//! happening implicitly through nested recipe writes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    database::IngredientsManager,
    errors::AppError,
    models::Ingredient,
    routes::authenticate,
    server::ServerResources,
};

/// Response for an ingredient
#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientResponse {
    /// Unique identifier
    pub id: String,
    /// Ingredient name
    pub name: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.to_string(),
            name: ingredient.name,
        }
    }
}

/// Query parameters for listing ingredients
#[derive(Debug, Deserialize, Default)]
pub struct ListIngredientsQuery {
    /// When `1`, only ingredients assigned to at least one recipe are returned
    pub assigned_only: Option<u8>,
}

/// Request to rename an ingredient
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientRequest {
    pub name: String,
}

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipe/ingredients", get(Self::handle_list))
            .route("/api/recipe/ingredients/:id", patch(Self::handle_update))
            .route("/api/recipe/ingredients/:id", put(Self::handle_update))
            .route("/api/recipe/ingredients/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> IngredientsManager {
        IngredientsManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/recipe/ingredients - List the caller's ingredients
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListIngredientsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let assigned_only = query.assigned_only.unwrap_or(0) != 0;
        let ingredients = Self::manager(&resources)
            .list(auth.user_id, assigned_only)
            .await?;

        let response: Vec<IngredientResponse> = ingredients.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH/PUT /api/recipe/ingredients/:id - Rename an ingredient
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdateIngredientRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let ingredient_id = parse_ingredient_id(&id)?;

        let ingredient = Self::manager(&resources)
            .update(ingredient_id, auth.user_id, &body.name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;

        let response: IngredientResponse = ingredient.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipe/ingredients/:id - Delete an ingredient
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let ingredient_id = parse_ingredient_id(&id)?;

        let deleted = Self::manager(&resources)
            .delete(ingredient_id, auth.user_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Ingredient {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}

/// Parse a path id, mapping malformed values to 404
fn parse_ingredient_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Ingredient {id}")))
}
