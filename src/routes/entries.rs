// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry routes for authenticated users.
//!
//! The list response is a ready-to-render view model: display metadata is
//! resolved per type, dates carry a localized long-form rendering, and an
//! empty list ships the empty-state message instead of a bare region.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentSession;
use crate::models::{Entry, EntryType, NewEntry, TypeInfo};
use crate::time_utils::{format_date_ko, today_local};
use crate::AppState;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Shown instead of an empty list region.
const EMPTY_LIST_MESSAGE: &str = "아직 기록이 없습니다";

/// Entry routes (require authentication via the session cookie).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route("/api/entries/{id}", delete(delete_entry))
        .route("/api/entry-types", get(entry_types))
}

// ─── View Models ─────────────────────────────────────────────

/// One entry, ready for display.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntryView {
    pub id: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub entry_type: EntryType,
    pub type_info: TypeInfo,
    pub title: String,
    /// Present only when the entry has detail text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Long-form localized date, e.g. `2024년 3월 1일`.
    pub date_display: String,
    pub created_at: String,
}

impl From<Entry> for EntryView {
    fn from(entry: Entry) -> Self {
        Self {
            type_info: entry.entry_type.info(),
            date_display: format_date_ko(entry.date),
            id: entry.id,
            entry_type: entry.entry_type,
            title: entry.title,
            detail: entry.detail,
            date: entry.date,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EntriesResponse {
    pub entries: Vec<EntryView>,
    pub total: u32,
    /// True when the store was unreachable and this is the cached list.
    pub stale: bool,
    /// Set only when there are no entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

/// One selectable entry type for the form's type selector.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TypeOption {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub value: EntryType,
    #[serde(flatten)]
    pub info: TypeInfo,
}

fn build_list_response(entries: Vec<Entry>, stale: bool) -> EntriesResponse {
    let views: Vec<EntryView> = entries.into_iter().map(EntryView::from).collect();
    EntriesResponse {
        total: views.len() as u32,
        empty_message: views.is_empty().then(|| EMPTY_LIST_MESSAGE.to_string()),
        entries: views,
        stale,
    }
}

// ─── List ────────────────────────────────────────────────────

/// List the user's entries, newest date first (ties broken by creation
/// time, both ordered by the store).
///
/// Fetches are generation-stamped: a slow response that lost the race to a
/// newer one is discarded instead of overwriting the session cache. When
/// the store fails and a cached list exists, the cached list is served
/// flagged `stale` (no retry); without a cache the failure propagates.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentSession>,
) -> Result<Json<EntriesResponse>> {
    let session = &current.session;
    let seq = session.begin_fetch();

    match state.entries.list(&session.access_token()).await {
        Ok(rows) => {
            if !session.apply_fetch(seq, rows) {
                tracing::debug!(seq, "Discarded fetch result; a newer fetch already applied");
            }
        }
        Err(err) => {
            if let Some(cached) = session.cached_entries() {
                tracing::warn!(error = %err, "Entry fetch failed, serving cached list");
                return Ok(Json(build_list_response(cached, true)));
            }
            return Err(err);
        }
    }

    let entries = session.cached_entries().unwrap_or_default();
    Ok(Json(build_list_response(entries, false)))
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateEntryRequest {
    /// Defaults to `small_win`, matching the form's initial selection.
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[validate(length(min = 1, message = "제목을 입력해주세요"))]
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    /// Defaults to today (server-local calendar day).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Create one entry. The owner is always the session's user; a `user_id`
/// in the request body would be ignored by deserialization.
async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentSession>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryView>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if req.entry_type == EntryType::Unknown {
        return Err(AppError::BadRequest("unknown entry type".to_string()));
    }

    let new_entry = NewEntry {
        user_id: current.session.user.id.clone(),
        entry_type: req.entry_type,
        title: req.title,
        // Empty detail is stored as null, not as an empty string.
        detail: req.detail.filter(|d| !d.is_empty()),
        date: req.date.unwrap_or_else(today_local),
    };

    let created = state
        .entries
        .insert(&current.session.access_token(), &new_entry)
        .await?;

    tracing::info!(entry_id = %created.id, "Entry created");

    Ok((StatusCode::CREATED, Json(EntryView::from(created))))
}

// ─── Delete ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct DeleteParams {
    /// The client's attestation that the user confirmed the dialog.
    #[serde(default)]
    confirmed: bool,
}

/// Delete one entry by id. Requires `confirmed=true`; a declined
/// confirmation never reaches the store. No optimistic cache removal and
/// no automatic re-fetch — the next list call discovers the result.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentSession>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode> {
    if !params.confirmed {
        return Err(AppError::BadRequest(
            "delete requires confirmed=true".to_string(),
        ));
    }

    state
        .entries
        .delete(&current.session.access_token(), &id)
        .await?;

    tracing::info!(entry_id = %id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ─── Type Selector ───────────────────────────────────────────

/// The three selectable entry types with their display metadata, in
/// selector order. Selection state stays in the frontend.
async fn entry_types() -> Json<Vec<TypeOption>> {
    Json(
        EntryType::ALL
            .into_iter()
            .map(|value| TypeOption {
                value,
                info: value.info(),
            })
            .collect(),
    )
}
