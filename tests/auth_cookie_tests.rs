// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-out and cookie attribute tests.
//!
//! Sign-out is unconditional: it must clear the cookie and return 204
//! whether or not a valid session was presented, and removal attributes
//! must match the creation attributes for localhost and production-style
//! frontends.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use tower::ServiceExt;

mod common;

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

#[tokio::test]
async fn test_signout_without_session_still_clears_cookie() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookies = set_cookie_headers(&response);
    let session_cookie = find_cookie(&set_cookies, "kudolog_session");

    assert!(session_cookie.contains("Path=/"));
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("SameSite=Lax"));
    assert!(session_cookie.contains("Max-Age=0"));
    assert!(!session_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_signout_removes_live_session() {
    let (app, state) = common::create_test_app();
    let (session_id, cookie) = common::signed_in_session(&state);

    // Another tab is subscribed to this session's events.
    let session = state.sessions.get(&session_id).unwrap();
    let mut other_tab = session.subscribe();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signout")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Upstream revocation fails (offline identity service) but sign-out
    // succeeds regardless.
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.sessions.get(&session_id).is_none());

    // The other tab hears about it.
    assert_eq!(
        other_tab.recv().await,
        Some(kudo_log::session::SessionChange::SignedOut)
    );
}

#[tokio::test]
async fn test_signout_cookie_secure_for_https_frontend() {
    let (app, _) =
        common::create_test_app_with_frontend_url("https://kudolog.example.com");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookies = set_cookie_headers(&response);
    let session_cookie = find_cookie(&set_cookies, "kudolog_session");

    assert!(session_cookie.contains("Secure"));
    assert!(session_cookie.contains("Max-Age=0"));
}
