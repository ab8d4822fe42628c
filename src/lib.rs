// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! alog - structured observability for autonomous agents.
//!
//! Every event an agent produces is recorded as an [`Envelope`] on one of
//! three surfaces:
//!
//! - **operational**: what the agent did (method calls, tools, errors)
//! - **cognitive**: why it did it (thoughts, plans, confidence)
//! - **contextual**: what it knew (retrievals, memory writes)
//!
//! # Architecture
//!
//! - [`event`] - Envelope and surface payload types
//! - [`logger`] - Envelope construction, persistence and export
//! - [`instrument`] - Wrapping agent operations without modifying them
//! - [`reasoning`] - Separating embedded reasoning traces from results
//! - [`trace`] - Trace and span correlation
//! - [`sink`] - JSONL, in-memory and SQLite persistence
//! - [`bridge`] - Exporting envelopes as tracing spans
//! - [`merge`] - Offline merging and trace grouping
//! - [`config`] - Configuration loading and merging
//! - [`global`] - Process-wide logger
//! - [`telemetry`] - Console output for alog's own diagnostics
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```rust,ignore
//! use alog::{instrument, CallShape, InstrumentationConfig, Logger};
//!
//! let logger = Arc::new(Logger::from_config(&InstrumentationConfig::default())?);
//! let agent = instrument(logger.clone(), ResearchAgent::new(), "researcher", None);
//! let answer = agent.call("answer", CallShape::positional(1), |a| a.answer(question))?;
//! println!("{:?}", logger.get_stats()?);
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod global;
pub mod instrument;
pub mod logger;
pub mod merge;
pub mod reasoning;
pub mod sink;
pub mod telemetry;
pub mod trace;

// Re-export commonly used types at crate root
pub use config::InstrumentationConfig;
pub use error::{BridgeError, ConfigError, InstrumentError, Result, SerializationError, SinkError};
pub use event::{
    CognitiveEvent, ContextOperation, ContextualEvent, Envelope, Event, Level, OperationStatus,
    OperationalEvent, Surface,
};
pub use instrument::{instrument, CallShape, Instrumentable, Instrumented, MethodOutput};
pub use logger::{LogStats, Logger, RecordOptions};
pub use reasoning::Reasoned;
pub use trace::{CallContext, SpanId, TraceId};

/// alog version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
