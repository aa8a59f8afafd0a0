// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests for the entry and auth endpoints.
//!
//! All of these fail before any collaborator round trip, so they run
//! against the offline test app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn error_code(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    value["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_create_entry_empty_title_rejected() {
    let (app, state) = common::create_test_app();
    let (_, cookie) = common::signed_in_session(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/entries")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type": "small_win", "title": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "bad_request");
}

#[tokio::test]
async fn test_create_entry_unknown_type_rejected() {
    let (app, state) = common::create_test_app();
    let (_, cookie) = common::signed_in_session(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/entries")
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type": "big_win", "title": "shipped"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_without_confirmation_rejected() {
    let (app, state) = common::create_test_app();
    let (_, cookie) = common::signed_in_session(&state);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/entries/3f6e0a2e-7f4b-4a59-9b3e-0a5a6a1f0c01")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Declined or missing confirmation must never reach the store.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "bad_request");
}

#[tokio::test]
async fn test_signup_invalid_email_rejected() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email": "not-an-email", "password": "secret"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fetch_failure_without_cache_is_store_error() {
    let (app, state) = common::create_test_app();
    let (_, cookie) = common::signed_in_session(&state);

    // The offline store is unreachable and no fetch has succeeded yet, so
    // there is no cached list to fall back to.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/entries")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(response).await, "store_error");
}
