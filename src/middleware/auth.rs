// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie authentication middleware.
//!
//! The cookie value is a signed JWT whose subject is an opaque session id;
//! the id resolves to a live [`crate::session::Session`] in the registry.
//! The identity service's own tokens never leave the server.

use crate::session::Session;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "kudolog_session";

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (opaque session id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Live session extracted from the cookie, injected into handlers.
#[derive(Clone)]
pub struct CurrentSession {
    pub session_id: String,
    pub session: Arc<Session>,
}

/// Middleware that requires a live authenticated session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(StatusCode::UNAUTHORIZED),
        }
    };

    let session_id = decode_session_id(&token, &state.config.session_signing_key)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // A valid JWT whose session was removed (signed out elsewhere, or the
    // server restarted) is still unauthenticated.
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(CurrentSession {
        session_id,
        session,
    });

    Ok(next.run(request).await)
}

/// Decode and verify a session cookie JWT, returning the session id.
pub fn decode_session_id(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
}

/// Create the session cookie JWT for a session id.
pub fn create_session_token(session_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: session_id.to_string(),
        iat: now,
        exp: now + 30 * 24 * 60 * 60, // 30 days
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
