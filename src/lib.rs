// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Kudo Log: record praise, small wins, and learnings
//!
//! This crate provides the backend API for the Kudo Log frontend. Identity
//! and entry storage are delegated to external managed services; the server
//! owns session lifecycle, validation, and view-model shaping.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use services::{EntryStore, IdentityClient};
use session::SessionRegistry;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: IdentityClient,
    pub entries: EntryStore,
    pub sessions: SessionRegistry,
}
