// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Micro-summary model.
//!
//! Declared to match the `micro_summaries` table shape. No code path
//! produces or consumes these yet; the summarization pipeline is a later
//! phase.

use serde::{Deserialize, Serialize};

/// One generated summary of an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroSummary {
    /// Row ID (store-generated UUID)
    pub id: String,
    /// Entry this summary was generated from
    pub entry_id: String,
    /// What was done
    pub action: String,
    /// Why it mattered
    pub impact: Option<String>,
    /// Supporting evidence
    pub evidence: Option<String>,
    /// Tokens spent generating the summary
    pub tokens_used: Option<u32>,
    /// Store-managed timestamp (ISO 8601)
    pub created_at: String,
}
