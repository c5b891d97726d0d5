// ABOUTME: Route handlers for the tag REST API
// ABOUTME: Provides owner-scoped listing, renaming, and deletion of recipe tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

//! Tag routes
//!
//! Tags are listed, renamed, and deleted here; creation happens implicitly
//! through nested recipe writes. All endpoints require a bearer token and
//! only ever operate on the caller's own tags.

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
    database::TagsManager,
    errors::AppError,
    models::Tag,
    routes::authenticate,
    server::ServerResources,
};

/// Response for a tag
#[derive(Debug, Serialize, Deserialize)]
pub struct TagResponse {
    /// Unique identifier
    pub id: String,
    /// Tag name
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name,
        }
    }
}

/// Query parameters for listing tags
#[derive(Debug, Deserialize, Default)]
pub struct ListTagsQuery {
    /// When `1`, only tags assigned to at least one recipe are returned
    pub assigned_only: Option<u8>,
}

/// Request to rename a tag
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: String,
}

/// Tag routes handler
pub struct TagRoutes;

impl TagRoutes {
    /// Create all tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipe/tags", get(Self::handle_list))
            .route("/api/recipe/tags/:id", patch(Self::handle_update))
            .route("/api/recipe/tags/:id", put(Self::handle_update))
            .route("/api/recipe/tags/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> TagsManager {
        TagsManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/recipe/tags - List the caller's tags
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListTagsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;

        let assigned_only = query.assigned_only.unwrap_or(0) != 0;
        let tags = Self::manager(&resources)
            .list(auth.user_id, assigned_only)
            .await?;

        let response: Vec<TagResponse> = tags.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PATCH/PUT /api/recipe/tags/:id - Rename a tag
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdateTagRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let tag_id = parse_tag_id(&id)?;

        let tag = Self::manager(&resources)
            .update(tag_id, auth.user_id, &body.name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {id}")))?;

        let response: TagResponse = tag.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipe/tags/:id - Delete a tag
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let tag_id = parse_tag_id(&id)?;

        let deleted = Self::manager(&resources)
            .delete(tag_id, auth.user_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Tag {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}

/// Parse a path id, mapping malformed values to 404
///
/// A caller probing with a non-UUID path segment learns no more than one
/// probing with someone else's id.
fn parse_tag_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Tag {id}")))
}
