// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side session registry.
//!
//! A session wraps the identity service's tokens together with the resolved
//! user, a broadcast channel of session-change events (one channel per
//! session, shared by every tab holding the cookie), and the cached entry
//! list. Entry fetches are stamped with a monotonic generation so a slow
//! response that lost the race can never overwrite a newer one.

use crate::models::Entry;
use crate::services::identity::SessionUser;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;

/// Session id entropy in bytes (before base64 encoding).
const SESSION_ID_BYTES: usize = 32;

/// Buffered events per subscriber. Subscribers that lag past this skip
/// ahead rather than erroring out the stream.
const EVENT_BUFFER: usize = 16;

/// A session lifecycle event, delivered to every subscriber of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionChange {
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

/// Identity service token pair held by a session.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Cached entry list with the generation of the fetch that produced it.
#[derive(Default)]
struct EntryCache {
    entries: Vec<Entry>,
    applied_seq: u64,
    populated: bool,
}

/// One signed-in session.
pub struct Session {
    pub user: SessionUser,
    tokens: RwLock<SessionTokens>,
    events: broadcast::Sender<SessionChange>,
    cache: Mutex<EntryCache>,
    fetch_seq: AtomicU64,
}

impl Session {
    fn new(user: SessionUser, tokens: SessionTokens) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            user,
            tokens: RwLock::new(tokens),
            events,
            cache: Mutex::new(EntryCache::default()),
            fetch_seq: AtomicU64::new(0),
        }
    }

    /// Current access token.
    pub fn access_token(&self) -> String {
        self.tokens.read().unwrap().access_token.clone()
    }

    /// Current refresh token.
    pub fn refresh_token(&self) -> String {
        self.tokens.read().unwrap().refresh_token.clone()
    }

    /// Replace both tokens after a refresh grant.
    pub fn set_tokens(&self, tokens: SessionTokens) {
        *self.tokens.write().unwrap() = tokens;
    }

    /// Subscribe to session-change events. The subscription is released
    /// when the returned handle is dropped.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.events.subscribe(),
        }
    }

    /// Emit a session-change event to all live subscribers.
    pub fn emit(&self, change: SessionChange) {
        // Err only means no subscriber is listening right now.
        let _ = self.events.send(change);
    }

    /// Number of live event subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Reserve the next fetch generation. Call before issuing the store
    /// query; pass the stamp to [`Session::apply_fetch`] with the result.
    pub fn begin_fetch(&self) -> u64 {
        self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a fetch result. Returns false (and keeps the cache) when a
    /// newer fetch has already been applied.
    pub fn apply_fetch(&self, seq: u64, entries: Vec<Entry>) -> bool {
        let mut cache = self.cache.lock().unwrap();
        if seq <= cache.applied_seq {
            return false;
        }
        cache.entries = entries;
        cache.applied_seq = seq;
        cache.populated = true;
        true
    }

    /// Snapshot of the cached entries. None until the first successful fetch.
    pub fn cached_entries(&self) -> Option<Vec<Entry>> {
        let cache = self.cache.lock().unwrap();
        cache.populated.then(|| cache.entries.clone())
    }
}

/// Receiver half of a session's event channel.
pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionChange>,
}

impl SessionSubscription {
    /// Wait for the next event. Lagged subscribers skip missed events.
    pub async fn recv(&mut self) -> Option<SessionChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Registry of live sessions, keyed by opaque session id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a signed-in user and emit `signed_in`.
    pub fn create(&self, user: SessionUser, tokens: SessionTokens) -> (String, Arc<Session>) {
        let id = new_session_id();
        let session = Arc::new(Session::new(user, tokens));
        self.sessions.insert(id.clone(), session.clone());
        session.emit(SessionChange::SignedIn);
        (id, session)
    }

    /// Look up a live session.
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Remove a session, emitting `signed_out` to its subscribers (other
    /// tabs drop to the login view on this event).
    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let (_, session) = self.sessions.remove(id)?;
        session.emit(SessionChange::SignedOut);
        Some(session)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Generate a random URL-safe session id.
fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .expect("system RNG failure");
    URL_SAFE_NO_PAD.encode(bytes)
}
