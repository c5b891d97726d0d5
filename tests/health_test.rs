// ABOUTME: Integration test for the health check endpoint
// ABOUTME: Verifies liveness reporting and database connectivity status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Labs

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use common::{create_test_resources, json_request, response_json, test_router};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint_reports_ok() {
    let resources = create_test_resources().await.unwrap();

    let response = test_router(&resources)
        .oneshot(json_request("GET", "/api/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
    assert_eq!(json["service"], "pantry-api-server");
}
