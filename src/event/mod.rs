// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Event envelope and surface schemas.
//!
//! Each recorded occurrence is an [`Envelope`] wrapping one surface payload:
//!
//! - [`OperationalEvent`] - method lifecycle (start/complete/error) and timing
//! - [`CognitiveEvent`] - reasoning traces: thoughts, goals, plans
//! - [`ContextualEvent`] - external data access: retrieval, cache, storage

mod envelope;
mod payload;

pub use envelope::{Envelope, Level, Surface};
pub use payload::{
    hash_memory_state, CognitiveEvent, ContextOperation, ContextualEvent, Event,
    OperationStatus, OperationalEvent, MAX_RETRIEVED_ITEMS, MAX_THOUGHT_CHARS,
    TRUNCATION_MARKER,
};
