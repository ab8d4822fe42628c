// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace and span correlation.
//!
//! Every envelope carries a `trace_id` grouping one causal chain and a
//! `span_id` unique to the envelope. A [`TraceContext`] is owned by each
//! logger and retains the current trace id; a [`CallContext`] carries an
//! explicit trace id through a call chain instead.

mod context;
mod ids;

pub use context::{CallContext, TraceContext};
pub use ids::{EventId, SpanId, TraceId};
