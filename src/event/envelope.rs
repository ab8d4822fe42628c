// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The common wrapper around every recorded event.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trace::{EventId, SpanId, TraceId};

use super::payload::{CognitiveEvent, ContextualEvent, Event, OperationalEvent};

/// One of the three fixed event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Method lifecycle and timing.
    Operational,
    /// Reasoning traces.
    Cognitive,
    /// External data access.
    Contextual,
}

impl Surface {
    /// All surfaces, in sink order.
    pub const ALL: [Surface; 3] = [Surface::Operational, Surface::Cognitive, Surface::Contextual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Operational => "operational",
            Surface::Cognitive => "cognitive",
            Surface::Contextual => "contextual",
        }
    }

    /// File name of this surface's line-delimited sink.
    pub fn file_name(&self) -> &'static str {
        match self {
            Surface::Operational => "operational.jsonl",
            Surface::Cognitive => "cognitive.jsonl",
            Surface::Contextual => "contextual.jsonl",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "operational" => Ok(Surface::Operational),
            "cognitive" => Ok(Surface::Cognitive),
            "contextual" => Ok(Surface::Contextual),
            other => Err(format!("unknown surface: {}", other)),
        }
    }
}

/// Severity tier of an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// The closest `tracing` level, used for console echo and filters.
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warning => tracing::Level::WARN,
            Level::Error | Level::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

/// One recorded occurrence.
///
/// Envelopes are created by the logger and never mutated afterwards, so all
/// fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct Envelope {
    id: EventId,
    timestamp: DateTime<Utc>,
    agent: String,
    surface: Surface,
    level: Level,
    trace_id: TraceId,
    span_id: SpanId,
    event: Event,
}

impl Envelope {
    pub(crate) fn new(
        timestamp: DateTime<Utc>,
        agent: impl Into<String>,
        level: Level,
        trace_id: TraceId,
        span_id: SpanId,
        event: Event,
    ) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            agent: agent.into(),
            surface: event.surface(),
            level,
            trace_id,
            span_id,
            event,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The operational payload, if this is an operational envelope.
    pub fn operational(&self) -> Option<&OperationalEvent> {
        match &self.event {
            Event::Operational(event) => Some(event),
            _ => None,
        }
    }

    /// The cognitive payload, if this is a cognitive envelope.
    pub fn cognitive(&self) -> Option<&CognitiveEvent> {
        match &self.event {
            Event::Cognitive(event) => Some(event),
            _ => None,
        }
    }

    /// The contextual payload, if this is a contextual envelope.
    pub fn contextual(&self) -> Option<&ContextualEvent> {
        match &self.event {
            Event::Contextual(event) => Some(event),
            _ => None,
        }
    }
}

/// Wire form used for decoding: the payload shape is chosen by `surface`.
#[derive(Deserialize)]
struct RawEnvelope {
    id: EventId,
    timestamp: DateTime<Utc>,
    agent: String,
    surface: Surface,
    level: Level,
    trace_id: TraceId,
    span_id: SpanId,
    event: serde_json::Value,
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = String;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let event = match raw.surface {
            Surface::Operational => serde_json::from_value(raw.event).map(Event::Operational),
            Surface::Cognitive => serde_json::from_value(raw.event).map(Event::Cognitive),
            Surface::Contextual => serde_json::from_value(raw.event).map(Event::Contextual),
        }
        .map_err(|e| format!("invalid {} payload: {}", raw.surface, e))?;

        Ok(Self {
            id: raw.id,
            timestamp: raw.timestamp,
            agent: raw.agent,
            surface: raw.surface,
            level: raw.level,
            trace_id: raw.trace_id,
            span_id: raw.span_id,
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::OperationStatus;

    fn sample() -> Envelope {
        Envelope::new(
            Utc::now(),
            "planner",
            Level::Info,
            TraceId::from("trace-1"),
            SpanId::from("span-1"),
            OperationalEvent::new("plan", OperationStatus::Start).into(),
        )
    }

    #[test]
    fn test_surface_follows_payload() {
        let env = sample();
        assert_eq!(env.surface(), Surface::Operational);
        assert!(env.operational().is_some());
        assert!(env.cognitive().is_none());
    }

    #[test]
    fn test_envelope_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["id", "timestamp", "agent", "surface", "level", "trace_id", "span_id", "event"] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(obj["surface"], "operational");
        assert_eq!(obj["level"], "INFO");
        // Absent payload fields stay in the line as null.
        assert!(obj["event"]["duration_sec"].is_null());
        assert!(obj["event"].as_object().unwrap().contains_key("error"));
    }

    #[test]
    fn test_decode_uses_surface_for_payload() {
        let env = sample();
        let line = serde_json::to_string(&env).unwrap();
        let parsed: Envelope = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, env);
    }

    #[test]
    fn test_decode_rejects_mismatched_payload() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["surface"] = "contextual".into();
        let result: Result<Envelope, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_level_parsing_and_order() {
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Critical".parse::<Level>().unwrap(), Level::Critical);
        assert!("loud".parse::<Level>().is_err());
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::Critical);
    }

    #[test]
    fn test_surface_file_names() {
        assert_eq!(Surface::Operational.file_name(), "operational.jsonl");
        assert_eq!("COGNITIVE".parse::<Surface>().unwrap(), Surface::Cognitive);
    }
}
