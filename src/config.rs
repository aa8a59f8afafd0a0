//! Application configuration loaded from environment variables.
//!
//! The identity and table services are reached through URLs and a shared
//! service API key, all provided by the deployment environment.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Identity service base URL (GoTrue-compatible, e.g. `https://x.supabase.co/auth/v1`)
    pub auth_url: String,
    /// Table service base URL (PostgREST-compatible, e.g. `https://x.supabase.co/rest/v1`)
    pub rest_url: String,
    /// Frontend URL for CORS and cookie attributes
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Service API key sent as `apikey` on every collaborator request
    pub service_api_key: String,
    /// HMAC key for the session cookie JWT (raw bytes)
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            auth_url: env::var("AUTH_URL").map_err(|_| ConfigError::Missing("AUTH_URL"))?,
            rest_url: env::var("REST_URL").map_err(|_| ConfigError::Missing("REST_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            service_api_key: env::var("SERVICE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SERVICE_API_KEY"))?,
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Default config for tests. Collaborator URLs point at an unroutable
    /// local port so any accidental network call fails fast.
    pub fn test_default() -> Self {
        Self {
            auth_url: "http://127.0.0.1:1/auth/v1".to_string(),
            rest_url: "http://127.0.0.1:1/rest/v1".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            service_api_key: "test_service_key".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!".to_vec(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
