// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry store client (PostgREST-compatible `entries` table).
//!
//! Every call forwards the caller's access token, so the store's
//! row-level-security policy scopes reads and writes to the owning user.
//! This server never filters by `user_id` itself.

use crate::error::AppError;
use crate::models::{Entry, NewEntry};
use serde::Deserialize;

/// Listing order: newest date first, insertion order breaking ties.
const LIST_ORDER: &str = "date.desc,created_at.desc";

/// Table service client.
#[derive(Clone)]
pub struct EntryStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EntryStore {
    /// Create a new client for the table service.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// List all entries visible to the token's user, ordered by `date`
    /// descending then `created_at` descending.
    pub async fn list(&self, access_token: &str) -> Result<Vec<Entry>, AppError> {
        let url = format!("{}/entries", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .query(&[("select", "*"), ("order", LIST_ORDER)])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Insert one entry and return the created row.
    pub async fn insert(&self, access_token: &str, entry: &NewEntry) -> Result<Entry, AppError> {
        let url = format!("{}/entries", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=representation")
            .bearer_auth(access_token)
            .json(entry)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let mut rows: Vec<Entry> = self.check_response_json(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Store("insert returned no row".to_string()))
    }

    /// Delete an entry by id. Deleting an id the user cannot see (absent or
    /// owned by someone else) is a no-op at the store.
    pub async fn delete(&self, access_token: &str, id: &str) -> Result<(), AppError> {
        let url = format!("{}/entries", self.base_url);

        let response = self
            .http
            .delete(&url)
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(access_token)
            .query(&[("id", id_filter(id))])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response(response).await
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
            .map_err(|e| AppError::Store(format!("JSON parse error: {}", e)))
    }

    /// Map a failure response to an error. An expired or revoked user token
    /// surfaces as `Unauthorized` so the frontend returns to login.
    async fn response_error(response: reqwest::Response) -> AppError {
        let status = response.status();

        if status.as_u16() == 401 {
            return AppError::Unauthorized;
        }

        let body = response.text().await.unwrap_or_default();
        let message = store_message(&body).unwrap_or(body);
        AppError::Store(format!("HTTP {}: {}", status, message))
    }
}

/// Equality filter in the table service's query syntax.
fn id_filter(id: &str) -> String {
    format!("eq.{}", id)
}

/// Extract the `message` field from a table service error body.
fn store_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|v| v.as_str())
        .map(String::from)
}
