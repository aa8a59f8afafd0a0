// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity service client (GoTrue-compatible API).
//!
//! Handles:
//! - Email/password sign-up (confirmation mail sent by the service)
//! - Sign-in via the password grant
//! - Token refresh via the refresh-token grant
//! - Sign-out (token revocation)
//! - Current-user lookup for an access token

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Identity service client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Authenticated principal as reported by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
}

/// Successful password or refresh-token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionUser,
}

/// Sign-up result. The service withholds most fields until the email is
/// confirmed, so everything is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl IdentityClient {
    /// Create a new client for the identity service.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Register a new account. On success the service sends a confirmation
    /// email; no session exists until the user confirms.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, AppError> {
        let url = format!("{}/signup", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Exchange email/password credentials for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, AppError> {
        let url = format!("{}/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Exchange a refresh token for fresh session tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IdentitySession, AppError> {
        let url = format!("{}/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Revoke an access token. Invalidates the session everywhere.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let url = format!("{}/logout", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        self.check_response(response).await
    }

    /// Look up the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<SessionUser, AppError> {
        let url = format!("{}/user", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::response_error(response).await)
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthApi(format!("JSON parse error: {}", e)))
    }

    /// Map a failure response to an error. Credential rejections become
    /// `AuthFailed` with the service's own message; everything else is a
    /// service-level failure.
    async fn response_error(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));

        match status.as_u16() {
            400 | 401 | 403 | 422 => AppError::AuthFailed(message),
            _ => AppError::AuthApi(format!("HTTP {}: {}", status, message)),
        }
    }
}

/// Extract the human-readable message from an identity service error body.
/// The service uses different keys depending on the endpoint.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}
