// ABOUTME: Integration tests for the ingredient REST API
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
    recipes::CreateRecipeRequest, IngredientsManager, RecipesManager,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use tower::ServiceExt;

#[tokio::test]
async fn test_auth_required_for_ingredients() {
    let resources = create_test_resources().await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request("GET", "/api/recipe/ingredients", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_retrieve_ingredients_ordered_by_name_descending() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    ingredients.get_or_create(user_id, "Kale").await.unwrap();
    ingredients.get_or_create(user_id, "Vanilla").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/ingredients",
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
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Vanilla", "Kale"]);
}

#[tokio::test]
async fn test_ingredients_limited_to_authenticated_user() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let (other_id, _) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    let mine = ingredients.get_or_create(user_id, "Turmeric").await.unwrap();
    ingredients.get_or_create(other_id, "Pepper").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/ingredients",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Turmeric");
    assert_eq!(listed[0]["id"], mine.id.to_string());
}

#[tokio::test]
async fn test_update_ingredient() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    let ingredient = ingredients.get_or_create(user_id, "Corriander").await.unwrap();

    let body = json!({"name": "Coriander"});
    let response = test_router(&resources)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/recipe/ingredients/{}", ingredient.id),
            Some(&bearer_for(&resources, &user)),
            Some(&body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    assert_eq!(json["name"], "Coriander");

    let stored = ingredients.get(ingredient.id, user_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Coriander");
}

#[tokio::test]
async fn test_update_foreign_ingredient_returns_404() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, _) = create_test_user(&resources.database).await.unwrap();
    let (_, other) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    let ingredient = ingredients.get_or_create(user_id, "Saffron").await.unwrap();

    let body = json!({"name": "Hijacked"});
    let response = test_router(&resources)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/recipe/ingredients/{}", ingredient.id),
            Some(&bearer_for(&resources, &other)),
            Some(&body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stored = ingredients.get(ingredient.id, user_id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Saffron");
}

#[tokio::test]
async fn test_delete_ingredient() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    let ingredient = ingredients.get_or_create(user_id, "Lettuce").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "DELETE",
            &format!("/api/recipe/ingredients/{}", ingredient.id),
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(ingredients.get(ingredient.id, user_id).await.unwrap().is_none());
    assert_eq!(ingredients.count(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_foreign_ingredient_returns_404() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, _) = create_test_user(&resources.database).await.unwrap();
    let (_, other) = create_test_user_with_email(&resources.database, "other@example.com")
        .await
        .unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());

    let ingredient = ingredients.get_or_create(user_id, "Basil").await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "DELETE",
            &format!("/api/recipe/ingredients/{}", ingredient.id),
            Some(&bearer_for(&resources, &other)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ingredients.get(ingredient.id, user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_assigned_only_filter() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let ingredients = IngredientsManager::new(resources.database.pool().clone());
    let recipes = RecipesManager::new(resources.database.pool().clone());

    ingredients.get_or_create(user_id, "Unused").await.unwrap();
    recipes
        .create(
            user_id,
            &CreateRecipeRequest {
                title: "Apple crumble".to_string(),
                description: None,
                time_minutes: 40,
                price: Decimal::from_str("3.00").unwrap(),
                link: None,
                tags: Vec::new(),
                ingredients: vec!["Apples".to_string()],
            },
        )
        .await
        .unwrap();

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/ingredients?assigned_only=1",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Apples");
}

#[tokio::test]
async fn test_assigned_only_filter_is_distinct() {
    let resources = create_test_resources().await.unwrap();
    let (user_id, user) = create_test_user(&resources.database).await.unwrap();
    let recipes = RecipesManager::new(resources.database.pool().clone());

    for title in ["Scrambled eggs", "Herb omelette"] {
        recipes
            .create(
                user_id,
                &CreateRecipeRequest {
                    title: title.to_string(),
                    description: None,
                    time_minutes: 10,
                    price: Decimal::from_str("2.50").unwrap(),
                    link: None,
                    tags: Vec::new(),
                    ingredients: vec!["Eggs".to_string()],
                },
            )
            .await
            .unwrap();
    }

    let response = test_router(&resources)
        .oneshot(json_request(
            "GET",
            "/api/recipe/ingredients?assigned_only=1",
            Some(&bearer_for(&resources, &user)),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await.unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}
