// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for the external collaborators.

pub mod entries;
pub mod identity;

pub use entries::EntryStore;
pub use identity::{IdentityClient, IdentitySession, SessionUser, SignUpResult};
