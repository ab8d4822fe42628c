// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Mapping of envelopes onto external tracing spans.
//!
//! Each recorded envelope becomes exactly one span named
//! `"{agent}.{surface}"`. A start/complete/error triple for one call therefore
//! produces three independent spans rather than a parent with children.
//!
//! The backend attribute model only holds scalars, so sequences and maps are
//! flattened to JSON text. A value that cannot be represented degrades to an
//! error marker; the rest of the span is still emitted.

mod backend;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use backend::{RecordedSpan, RecordingBackend, SpanBackend, TracingBackend};

use crate::error::{BridgeError, SerializationError};
use crate::event::{Event, Surface};

/// A scalar span attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) => f.write_str(s),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Float(x) => write!(f, "{}", x),
            AttributeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

/// Marker substituted for an attribute that failed to serialize.
pub fn error_marker(type_name: &str) -> String {
    format!("<error serializing value: {}>", type_name)
}

/// Convert one non-null JSON value into a span attribute.
pub fn to_attribute(value: &Value) -> Result<AttributeValue, SerializationError> {
    match value {
        Value::String(s) => Ok(AttributeValue::Str(s.clone())),
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(AttributeValue::Int(i))
            } else if n.is_u64() {
                Err(SerializationError::Unrepresentable { type_name: "u64" })
            } else {
                n.as_f64()
                    .map(AttributeValue::Float)
                    .ok_or(SerializationError::Unrepresentable { type_name: "number" })
            }
        }
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value)
            .map(AttributeValue::Str)
            .map_err(|e| SerializationError::Encode {
                type_name: json_type_name(value),
                message: e.to_string(),
            }),
        Value::Null => Err(SerializationError::Unrepresentable { type_name: "null" }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Emits one span per envelope through a [`SpanBackend`].
#[derive(Clone)]
pub struct SpanBridge {
    backend: Arc<dyn SpanBackend>,
}

impl SpanBridge {
    pub fn new(backend: Arc<dyn SpanBackend>) -> Self {
        Self { backend }
    }

    /// A bridge emitting through the `tracing` crate.
    pub fn tracing(service_name: impl Into<String>, endpoint: Option<String>) -> Self {
        let mut backend = TracingBackend::new(service_name);
        if let Some(endpoint) = endpoint {
            backend = backend.with_endpoint(endpoint);
        }
        Self::new(Arc::new(backend))
    }

    pub fn span_name(agent: &str, surface: Surface) -> String {
        format!("{}.{}", agent, surface)
    }

    /// Build the attribute list for an event: `surface` and `agent` first,
    /// then every non-null payload field.
    pub fn attributes(surface: Surface, agent: &str, event: &Event) -> Result<Vec<(String, AttributeValue)>, BridgeError> {
        let payload = serde_json::to_value(event)?;

        let mut attributes = vec![
            ("surface".to_string(), AttributeValue::from(surface.as_str())),
            ("agent".to_string(), AttributeValue::from(agent)),
        ];

        if let Value::Object(fields) = payload {
            for (key, value) in fields {
                if value.is_null() {
                    continue;
                }
                let attribute = to_attribute(&value).unwrap_or_else(|e| {
                    tracing::debug!(attribute = %key, error = %e, "Degrading span attribute");
                    AttributeValue::Str(error_marker(e.type_name()))
                });
                attributes.push((key, attribute));
            }
        }

        Ok(attributes)
    }

    /// Emit the span for one envelope.
    pub fn emit(&self, surface: Surface, agent: &str, event: &Event) -> Result<(), BridgeError> {
        let attributes = Self::attributes(surface, agent, event)?;
        self.backend.emit(&Self::span_name(agent, surface), &attributes)
    }
}

impl fmt::Debug for SpanBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanBridge").finish_non_exhaustive()
    }
}
