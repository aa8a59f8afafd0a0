// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use kudo_log::config::Config;
use kudo_log::middleware::auth::create_session_token;
use kudo_log::routes::create_router;
use kudo_log::services::identity::SessionUser;
use kudo_log::services::{EntryStore, IdentityClient};
use kudo_log::session::{SessionRegistry, SessionTokens};
use kudo_log::AppState;
use std::sync::Arc;

/// Create a test app with offline collaborators (unroutable URLs, so any
/// network call fails fast). Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_frontend_url("http://localhost:5173")
}

/// Same as [`create_test_app`], with a specific frontend URL (cookie and
/// CORS attributes derive from it).
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();

    let identity = IdentityClient::new(config.auth_url.clone(), config.service_api_key.clone());
    let entries = EntryStore::new(config.rest_url.clone(), config.service_api_key.clone());
    let sessions = SessionRegistry::new();

    let state = Arc::new(AppState {
        config,
        identity,
        entries,
        sessions,
    });

    (create_router(state.clone()), state)
}

/// Insert a signed-in session directly into the registry, bypassing the
/// identity service. Returns the session id and the Cookie header value.
#[allow(dead_code)]
pub fn signed_in_session(state: &Arc<AppState>) -> (String, String) {
    let (session_id, _session) = state.sessions.create(
        SessionUser {
            id: "U123".to_string(),
            email: Some("dev@example.com".to_string()),
        },
        SessionTokens {
            access_token: "test_access_token".to_string(),
            refresh_token: "test_refresh_token".to_string(),
        },
    );

    let token = create_session_token(&session_id, &state.config.session_signing_key)
        .expect("session token");

    let cookie = format!("kudolog_session={}", token);
    (session_id, cookie)
}
