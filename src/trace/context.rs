// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace correlation state.

use std::sync::Mutex;

use super::ids::{SpanId, TraceId};

/// Holds the trace id retained by one logger.
///
/// The first resolution after construction (or after [`TraceContext::reset`])
/// allocates a fresh id and retains it. Explicit ids supplied by callers are
/// used as-is and never replace the retained one.
#[derive(Debug, Default)]
pub struct TraceContext {
    current: Mutex<Option<TraceId>>,
}

impl TraceContext {
    /// Create an empty context with no retained trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the trace id for one envelope.
    pub fn resolve(&self, explicit: Option<TraceId>) -> TraceId {
        if let Some(trace_id) = explicit {
            return trace_id;
        }

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.get_or_insert_with(TraceId::new).clone()
    }

    /// The retained trace id, if one has been allocated.
    pub fn current(&self) -> Option<TraceId> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Forget the retained trace id; the next resolution allocates a new one.
    pub fn reset(&self) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Allocate a span id for a single envelope.
    pub fn next_span_id(&self) -> SpanId {
        SpanId::new()
    }
}

/// Explicit correlation for one call chain.
///
/// Passing a `CallContext` through instrumented calls keeps causally
/// unrelated chains on separate traces even when they share a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    trace_id: TraceId,
    caller: Option<String>,
}

impl CallContext {
    /// Start a new call chain with a fresh trace id.
    pub fn new() -> Self {
        Self {
            trace_id: TraceId::new(),
            caller: None,
        }
    }

    /// Continue an existing trace.
    pub fn with_trace_id(trace_id: impl Into<TraceId>) -> Self {
        Self {
            trace_id: trace_id.into(),
            caller: None,
        }
    }

    /// Derive a context for calls made on behalf of `caller`, keeping the trace.
    pub fn child(&self, caller: impl Into<String>) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            caller: Some(caller.into()),
        }
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
