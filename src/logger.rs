// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The structured logger.
//!
//! [`Logger`] builds envelopes, persists them through its [`SinkSet`] and,
//! when a [`SpanBridge`] is attached, forwards each one as a span. Neither a
//! sink failure nor a bridge failure ever reaches the caller of a `record*`
//! method: both are logged at WARNING and the envelope is dropped (sink) or
//! left unexported (bridge).

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::bridge::SpanBridge;
use crate::config::InstrumentationConfig;
use crate::error::{ConfigError, SinkError};
use crate::event::{
    CognitiveEvent, ContextualEvent, Envelope, Event, Level, OperationalEvent, Surface,
};
use crate::sink::SinkSet;
use crate::trace::{SpanId, TraceContext, TraceId};

/// Per-record options.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub level: Level,
    pub trace_id: Option<TraceId>,
    pub span_id: Option<SpanId>,
}

impl RecordOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Use an explicit trace id for this record only.
    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Use an explicit span id, for manual correlation.
    pub fn with_span_id(mut self, span_id: impl Into<SpanId>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }
}

/// Event counts per persisted surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub operational_events: usize,
    pub cognitive_events: usize,
    /// `None` when contextual envelopes are not persisted.
    pub contextual_events: Option<usize>,
    pub total_events: usize,
}

/// Records operational, cognitive and contextual envelopes.
pub struct Logger {
    sinks: SinkSet,
    trace: TraceContext,
    bridge: Option<SpanBridge>,
    console_level: Level,
    /// Last issued timestamp. Held across stamping and appending so that
    /// appends are serialized and timestamps never go backwards.
    sequencer: Mutex<Option<DateTime<Utc>>>,
}

impl Logger {
    /// Create a logger over the given sinks, without a span bridge.
    pub fn new(sinks: SinkSet) -> Self {
        Self {
            sinks,
            trace: TraceContext::new(),
            bridge: None,
            console_level: Level::Info,
            sequencer: Mutex::new(None),
        }
    }

    /// Create a logger from configuration: JSONL sinks under
    /// `output_directory`, and a `tracing` span bridge when tracing is enabled.
    pub fn from_config(config: &InstrumentationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let sinks = SinkSet::jsonl(&config.output_directory, config.persist_contextual)?;
        let mut logger = Self::new(sinks).with_console_level(config.level);

        if config.enable_tracing {
            logger = logger.with_bridge(SpanBridge::tracing(
                config.service_name.clone(),
                Some(config.tracing_endpoint.clone()),
            ));
        }

        debug!(
            output_directory = %config.output_directory.display(),
            tracing = config.enable_tracing,
            persist_contextual = config.persist_contextual,
            "Logger created"
        );
        Ok(logger)
    }

    pub fn with_bridge(mut self, bridge: SpanBridge) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Minimum envelope level echoed to the console.
    pub fn with_console_level(mut self, level: Level) -> Self {
        self.console_level = level;
        self
    }

    pub fn has_bridge(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn persists(&self, surface: Surface) -> bool {
        self.sinks.persists(surface)
    }

    /// Record one envelope and return it.
    ///
    /// The surface is the payload's surface. Contextual envelopes are only
    /// persisted when a contextual sink is configured; they are still exported
    /// through the bridge.
    pub fn record(&self, agent: &str, event: impl Into<Event>, options: RecordOptions) -> Envelope {
        let event = event.into();
        let surface = event.surface();
        let trace_id = self.trace.resolve(options.trace_id);
        let span_id = options
            .span_id
            .unwrap_or_else(|| self.trace.next_span_id());

        let envelope = {
            let mut last = self.sequencer.lock().unwrap_or_else(|e| e.into_inner());
            let now = Utc::now();
            let timestamp = match *last {
                Some(previous) if previous > now => previous,
                _ => now,
            };
            *last = Some(timestamp);

            let envelope = Envelope::new(timestamp, agent, options.level, trace_id, span_id, event);
            self.persist(&envelope);
            envelope
        };

        if let Some(bridge) = &self.bridge {
            if let Err(e) = bridge.emit(surface, agent, envelope.event()) {
                warn!(agent, surface = %surface, error = %e, "Failed to emit span");
            }
        }

        self.echo(&envelope);
        envelope
    }

    /// Record an operational event.
    pub fn record_operational(&self, agent: &str, event: OperationalEvent, options: RecordOptions) -> Envelope {
        self.record(agent, event, options)
    }

    /// Record a cognitive event. Long thoughts are truncated and confidence
    /// is clamped to `0.0..=1.0`.
    pub fn record_cognitive(&self, agent: &str, event: CognitiveEvent, options: RecordOptions) -> Envelope {
        self.record(agent, event.normalized(), options)
    }

    /// Record a contextual event. Retrieved items are bounded.
    pub fn record_contextual(&self, agent: &str, event: ContextualEvent, options: RecordOptions) -> Envelope {
        self.record(agent, event.normalized(), options)
    }

    fn persist(&self, envelope: &Envelope) {
        let Some(sink) = self.sinks.get(envelope.surface()) else {
            return;
        };
        if let Err(e) = sink.append(envelope) {
            warn!(
                sink = %sink.describe(),
                envelope = %envelope.id(),
                error = %e,
                "Failed to persist envelope; dropping it"
            );
        }
    }

    fn echo(&self, envelope: &Envelope) {
        if envelope.level() < self.console_level {
            return;
        }
        let Some(event) = envelope.operational() else {
            return;
        };

        let agent = envelope.agent();
        let method = event.method.as_str();
        let status = event.status;
        match envelope.level() {
            Level::Debug => debug!(target: "alog", "{}.{} - {}", agent, method, status),
            Level::Info => info!(target: "alog", "{}.{} - {}", agent, method, status),
            Level::Warning => warn!(target: "alog", "{}.{} - {}", agent, method, status),
            Level::Error | Level::Critical => {
                error!(target: "alog", "{}.{} - {}", agent, method, status)
            }
        }
    }

    /// Every persisted envelope of `surface`, or of all persisted surfaces in
    /// sink order when `surface` is `None`. Always re-reads the sinks.
    pub fn get_logs(&self, surface: Option<Surface>) -> Result<Vec<Envelope>, SinkError> {
        let mut logs = Vec::new();
        for (sink_surface, sink) in self.sinks.configured() {
            if surface.map_or(true, |s| s == sink_surface) {
                logs.extend(sink.read_all()?);
            }
        }
        Ok(logs)
    }

    /// Counts per persisted surface.
    pub fn get_stats(&self) -> Result<LogStats, SinkError> {
        let count = |surface: Surface| -> Result<Option<usize>, SinkError> {
            self.sinks
                .get(surface)
                .map(|sink| sink.read_all().map(|logs| logs.len()))
                .transpose()
        };

        let operational_events = count(Surface::Operational)?.unwrap_or(0);
        let cognitive_events = count(Surface::Cognitive)?.unwrap_or(0);
        let contextual_events = count(Surface::Contextual)?;

        Ok(LogStats {
            operational_events,
            cognitive_events,
            contextual_events,
            total_events: operational_events + cognitive_events + contextual_events.unwrap_or(0),
        })
    }

    /// Truncate every configured sink. Every sink is attempted; the first
    /// failure is returned.
    pub fn clear_logs(&self) -> Result<(), SinkError> {
        let _guard = self.sequencer.lock().unwrap_or_else(|e| e.into_inner());
        let mut first_error = None;
        for (surface, sink) in self.sinks.configured() {
            if let Err(e) = sink.clear() {
                warn!(surface = %surface, sink = %sink.describe(), error = %e, "Failed to clear sink");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// The retained trace id, if any record has allocated one.
    pub fn current_trace_id(&self) -> Option<TraceId> {
        self.trace.current()
    }

    /// Forget the retained trace id; the next record starts a new trace.
    pub fn reset_trace(&self) {
        self.trace.reset();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.sinks)
            .field("bridge", &self.bridge.is_some())
            .field("console_level", &self.console_level)
            .finish()
    }
}
