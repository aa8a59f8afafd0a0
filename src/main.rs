// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Kudo Log API Server
//!
//! Backend for the Kudo Log achievement journal: delegated email/password
//! authentication plus CRUD over the row-scoped `entries` table.

use kudo_log::{
    config::Config,
    services::{EntryStore, IdentityClient},
    session::SessionRegistry,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Kudo Log API");

    // Clients for the external collaborators
    let identity = IdentityClient::new(config.auth_url.clone(), config.service_api_key.clone());
    tracing::info!(url = %config.auth_url, "Identity service client initialized");

    let entries = EntryStore::new(config.rest_url.clone(), config.service_api_key.clone());
    tracing::info!(url = %config.rest_url, "Entry store client initialized");

    // Server-side session registry, shared across all requests
    let sessions = SessionRegistry::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        entries,
        sessions,
    });

    // Build router
    let app = kudo_log::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kudo_log=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
