// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing backends consumed by the span bridge.

use std::sync::Mutex;

use tracing::info_span;

use crate::error::BridgeError;

use super::AttributeValue;

/// The single capability the bridge needs from a tracing backend:
/// emit one span with a name and a flat attribute list.
///
/// Transport, batching and retry are the backend's concern.
pub trait SpanBackend: Send + Sync {
    fn emit(&self, span_name: &str, attributes: &[(String, AttributeValue)]) -> Result<(), BridgeError>;
}

/// Emits spans through the `tracing` crate.
///
/// Attach any subscriber (fmt, OpenTelemetry layer, etc.) to receive them.
/// Span fields in `tracing` are declared statically, so the dynamic
/// attribute list is rendered into a single `attributes` field.
#[derive(Debug, Clone)]
pub struct TracingBackend {
    service_name: String,
    endpoint: Option<String>,
}

impl TracingBackend {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            endpoint: None,
        }
    }

    /// Record the collector endpoint on every span, for subscribers that route by it.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Render attributes as `key=value` pairs separated by spaces.
    /// String values are quoted and escaped so the pairs can be split apart.
    pub fn render(attributes: &[(String, AttributeValue)]) -> String {
        attributes
            .iter()
            .map(|(key, value)| match value {
                AttributeValue::Str(s) => format!("{}={:?}", key, s),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl SpanBackend for TracingBackend {
    fn emit(&self, span_name: &str, attributes: &[(String, AttributeValue)]) -> Result<(), BridgeError> {
        let rendered = Self::render(attributes);
        let span = info_span!(
            target: "alog::span",
            "alog.span",
            otel.name = %span_name,
            service.name = %self.service_name,
            exporter.endpoint = self.endpoint.as_deref().unwrap_or(""),
            attribute_count = attributes.len(),
            attributes = %rendered,
        );
        let _entered = span.enter();
        tracing::trace!(target: "alog::span", "span emitted");
        Ok(())
    }
}

/// A span captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSpan {
    pub name: String,
    pub attributes: Vec<(String, AttributeValue)>,
}

impl RecordedSpan {
    /// Look up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Keeps emitted spans in memory.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    spans: Mutex<Vec<RecordedSpan>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every span emitted so far.
    pub fn spans(&self) -> Vec<RecordedSpan> {
        self.spans.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.spans.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpanBackend for RecordingBackend {
    fn emit(&self, span_name: &str, attributes: &[(String, AttributeValue)]) -> Result<(), BridgeError> {
        self.spans
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedSpan {
                name: span_name.to_string(),
                attributes: attributes.to_vec(),
            });
        Ok(())
    }
}
