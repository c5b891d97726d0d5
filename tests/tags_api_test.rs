// ABOUTME: Integration tests for the tag REST API
// ABOUTME: Tests ownership isolation, renaming, deletion, and the assigned_only filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{
    bearer_for, create_test_resources, create_test_user, create_test_user_with_email,
    json_request, response_json, test_router,
};
use pantry_api_server::database::{
    recipes::CreateRecipeRequest, RecipesManager, TagsManager,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use tower::ServiceExt;

#[tokio::test]
async fn test_auth_required_for_tags() {
    let resources = create_test_resources().await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request("GET", "/api/recipe/tags", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_retrieve_tags_ordered_by_name_descending() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    tags.get_or_create(user_id, "Dessert").await.unwrap();
    tags.get_or_create(user_id, "Vegan").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/tags",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Vegan", "Dessert"]);
}

#[tokio::test]
async fn test_tags_limited_to_authenticated_user() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let (other_id, _) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    let mine = tags.get_or_create(user_id, "Comfort Food").await.unwrap();
    tags.get_or_create(other_id, "Fruity").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/tags",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Comfort Food");
    assert_eq!(listed[0]["id"], mine.id.to_string());
}

#[tokio::test]
async fn test_update_tag() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    let tag = tags.get_or_create(user_id, "After Dinner").await.unwrap();

    let body = json!({"name": "Dessert"});
    let response = test_router(&resources)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/recipe/tags/{}", tag.id),
            Some(&bearer_for(&resources, &user)),
            Some(&body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    assert_eq!(json["name"], "Dessert");

    let stored = tags.get(tag.id, user_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Dessert");
}

#[tokio::test]
async fn test_update_foreign_tag_returns_404() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, _) = create_test_user(&resources.database).await.unwrap();
    let (_, other) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    let tag = tags.get_or_create(user_id, "Private").await.unwrap();

    let body = json!({"name": "Hijacked"});
    let response = test_router(&resources)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/recipe/tags/{}", tag.id),
            Some(&bearer_for(&resources, &other)),
            Some(&body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stored = tags.get(tag.id, user_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Private");
}

#[tokio::test]
async fn test_rename_tag_to_existing_name_rejected() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    tags.get_or_create(user_id, "Dessert").await.unwrap();
    let tag = tags.get_or_create(user_id, "Sweet").await.unwrap();

    let body = json!({"name": "Dessert"});
    let response = test_router(&resources)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/recipe/tags/{}", tag.id),
            Some(&bearer_for(&resources, &user)),
            Some(&body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_tag() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    let tag = tags.get_or_create(user_id, "Breakfast").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "DELETE",
            &format!("/api/recipe/tags/{}", tag.id),
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(tags.get(tag.id, user_id).await.unwrap().is_none());
    assert_eq!(tags.count(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_foreign_tag_returns_404() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, _) = create_test_user(&resources.database).await.unwrap();
    let (_, other) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());

    let tag = tags.get_or_create(user_id, "Private").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "DELETE",
            &format!("/api/recipe/tags/{}", tag.id),
            Some(&bearer_for(&resources, &other)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(tags.get(tag.id, user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_assigned_only_filter() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let tags = TagsManager::new(resources.database.pool().clone());
    let recipes = RecipesManager::new(resources.database.pool().clone());

    tags.get_or_create(user_id, "Unused").await.unwrap();
    recipes
        .create(
            user_id,
            &CreateRecipeRequest {
                title: "Porridge".to_string(),
                description: None,
                time_minutes: 5,
                price: Decimal::from_str("1.50").unwrap(),
                link: None,
                tags: vec!["Breakfast".to_string()],
                ingredients: Vec::new(),
            },
        )
        .await
        .unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/tags?assigned_only=1",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Breakfast");
}

#[tokio::test]
async fn test_assigned_only_filter_is_distinct() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let recipes = RecipesManager::new(resources.database.pool().clone());

    for title in ["Pancakes", "Eggs Benedict"] {
        recipes
            .create(
                user_id,
                &CreateRecipeRequest {
                    title: title.to_string(),
                    description: None,
                    time_minutes: 15,
                    price: Decimal::from_str("4.00").unwrap(),
                    link: None,
                    tags: vec!["Breakfast".to_string()],
                    ingredients: Vec::new(),
                },
            )
            .await
            .unwrap();
    }

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/tags?assigned_only=1",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}
