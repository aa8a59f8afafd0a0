// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod entry;
pub mod summary;

pub use entry::{Entry, EntryType, NewEntry, TypeInfo};
pub use summary::MicroSummary;
