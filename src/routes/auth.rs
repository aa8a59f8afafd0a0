// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes.
//!
//! Sign-up, sign-in and sign-out delegate to the identity service; the
//! server keeps only an opaque session wrapping that service's tokens.
//! `/auth/events` streams session-change events so every tab holding the
//! session cookie re-evaluates routing (multi-tab sign-out).

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_session_token, decode_session_id, CurrentSession, SESSION_COOKIE,
};
use crate::session::{SessionChange, SessionTokens};
use crate::AppState;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Shown after a successful sign-up while the confirmation email is pending.
const SIGNUP_SUCCESS_MESSAGE: &str = "회원가입 성공! 이메일을 확인해주세요.";

/// Session cookie lifetime.
const SESSION_COOKIE_DAYS: i64 = 30;

/// Public authentication routes (no session required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
}

/// Authentication routes that require a live session.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/refresh", post(refresh))
        .route("/auth/events", get(events))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "올바른 이메일을 입력해주세요"))]
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInResponse {
    pub user: UserResponse,
}

// ─── Cookie Helpers ──────────────────────────────────────────

/// Build the session cookie. `Secure` tracks the frontend scheme so local
/// http development still works.
fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_COOKIE_DAYS))
        .build()
}

/// Removal cookie with the same attributes as creation, Max-Age=0.
fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

fn cookies_secure(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}

// ─── Handlers ────────────────────────────────────────────────

/// Register a new account. On success the identity service sends a
/// confirmation email; no session cookie is issued and the login view
/// shows the confirmation message instead of navigating.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<MessageResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Password policy (length >= 6) is the identity service's to enforce;
    // its rejection message is surfaced inline by the login view.
    let result = state.identity.sign_up(&req.email, &req.password).await?;

    tracing::info!(user_id = ?result.id, "Sign-up accepted, confirmation pending");

    Ok(Json(MessageResponse {
        message: SIGNUP_SUCCESS_MESSAGE.to_string(),
    }))
}

/// Exchange credentials for a session cookie.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<CredentialsRequest>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let granted = state.identity.sign_in(&req.email, &req.password).await?;

    let (session_id, session) = state.sessions.create(
        granted.user,
        SessionTokens {
            access_token: granted.access_token,
            refresh_token: granted.refresh_token,
        },
    );

    let token = create_session_token(&session_id, &state.config.session_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session token creation failed: {}", e)))?;

    tracing::info!(user_id = %session.user.id, "Signed in");

    let jar = jar.add(session_cookie(token, cookies_secure(&state)));

    Ok((
        jar,
        Json(SignInResponse {
            user: UserResponse {
                id: session.user.id.clone(),
                email: session.user.email.clone(),
            },
        }),
    ))
}

/// Sign out. Unconditional: the cookie is cleared and 204 returned even
/// when no valid session was presented or the upstream revocation fails.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
) -> (CookieJar, StatusCode) {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(String::from)
        });

    if let Some(session_id) =
        token.and_then(|t| decode_session_id(&t, &state.config.session_signing_key))
    {
        // remove() emits `signed_out` to every subscriber of this session.
        if let Some(session) = state.sessions.remove(&session_id) {
            if let Err(e) = state.identity.sign_out(&session.access_token()).await {
                tracing::warn!(error = %e, "Upstream sign-out failed, session removed anyway");
            }
            tracing::info!(user_id = %session.user.id, "Signed out");
        }
    }

    let jar = jar.add(removal_cookie(cookies_secure(&state)));
    (jar, StatusCode::NO_CONTENT)
}

/// Current user, re-validated against the identity service.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<UserResponse>> {
    let user = state
        .identity
        .get_user(&current.session.access_token())
        .await?;

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
    }))
}

/// Refresh the session's identity tokens.
async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentSession>,
) -> Result<StatusCode> {
    let refreshed = state
        .identity
        .refresh(&current.session.refresh_token())
        .await?;

    current.session.set_tokens(SessionTokens {
        access_token: refreshed.access_token,
        refresh_token: refreshed.refresh_token,
    });
    current.session.emit(SessionChange::TokenRefreshed);

    tracing::debug!(user_id = %current.session.user.id, "Session tokens refreshed");

    Ok(StatusCode::NO_CONTENT)
}

/// Stream session-change events. The broadcast subscription is released
/// when the client disconnects and the stream is dropped.
async fn events(
    Extension(current): Extension<CurrentSession>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let subscription = current.session.subscribe();

    let stream = stream::unfold(subscription, |mut subscription| async move {
        let change = subscription.recv().await?;
        let event = Event::default().event("session").json_data(&change).ok()?;
        Some((Ok::<_, Infallible>(event), subscription))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), false);
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("kudolog_session=tok"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn test_session_cookie_secure_for_https_frontend() {
        let cookie = session_cookie("tok".to_string(), true);
        assert!(cookie.to_string().contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let rendered = removal_cookie(false).to_string();
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("HttpOnly"));
    }
}
