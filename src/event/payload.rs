// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Surface-specific event payloads.
//!
//! Optional fields are always serialized, as `null` when absent, so every
//! line of a surface file carries the same set of keys.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::envelope::Surface;

/// Thoughts longer than this many characters are truncated.
pub const MAX_THOUGHT_CHARS: usize = 2000;

/// Appended to a truncated thought.
pub const TRUNCATION_MARKER: &str = "...";

/// At most this many retrieved items are kept on a contextual event.
pub const MAX_RETRIEVED_ITEMS: usize = 20;

/// Lifecycle status of an operational event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Start,
    Complete,
    Error,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Start => "start",
            OperationStatus::Complete => "complete",
            OperationStatus::Error => "error",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalEvent {
    pub method: String,
    pub status: OperationStatus,
    pub duration_sec: Option<f64>,
    pub tool_name: Option<String>,
    pub tool_parameters: Option<Map<String, Value>>,
    pub result_summary: Option<String>,
    pub error: Option<String>,
    pub token_usage: Option<BTreeMap<String, u64>>,
    pub latency_ms: Option<u64>,
    pub caller: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl OperationalEvent {
    pub fn new(method: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            method: method.into(),
            status,
            duration_sec: None,
            tool_name: None,
            tool_parameters: None,
            result_summary: None,
            error: None,
            token_usage: None,
            latency_ms: None,
            caller: None,
            metadata: Map::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_sec = Some(duration.as_secs_f64());
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        self.tool_name = Some(name.into());
        self.tool_parameters = Some(parameters);
        self
    }

    pub fn with_result_summary(mut self, summary: impl Into<String>) -> Self {
        self.result_summary = Some(summary.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Add a token counter, e.g. `("prompt_tokens", 120)`.
    pub fn with_token_usage(mut self, counter: impl Into<String>, value: u64) -> Self {
        self.token_usage
            .get_or_insert_with(BTreeMap::new)
            .insert(counter.into(), value);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = Some(latency.as_millis() as u64);
        self
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Reasoning trace event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CognitiveEvent {
    pub reasoning_step: Option<u32>,
    pub thought: Option<String>,
    pub plan: Option<String>,
    pub reflection: Option<String>,
    pub confidence: Option<f64>,
    pub goal: Option<String>,
    pub model: Option<String>,
    pub token_count: Option<u64>,
    pub prompt_excerpt: Option<String>,
    pub completion_excerpt: Option<String>,
}

impl CognitiveEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thought, truncating it to [`MAX_THOUGHT_CHARS`].
    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(truncate_thought(thought.into()));
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.reasoning_step = Some(step);
        self
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    /// Set the confidence, clamped to `0.0..=1.0`. NaN is dropped.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_token_count(mut self, tokens: u64) -> Self {
        self.token_count = Some(tokens);
        self
    }

    pub fn with_excerpts(mut self, prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        self.prompt_excerpt = Some(prompt.into());
        self.completion_excerpt = Some(completion.into());
        self
    }

    /// Enforce the thought cap and confidence range on a hand-built event.
    pub(crate) fn normalized(mut self) -> Self {
        self.thought = self.thought.map(truncate_thought);
        self.confidence = self.confidence.and_then(clamp_confidence);
        self
    }
}

/// Kind of external data access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextOperation {
    Retrieve,
    Store,
    Update,
    Delete,
}

/// External data access event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualEvent {
    pub operation: ContextOperation,
    pub source_type: Option<String>,
    pub source_name: Option<String>,
    pub query: Option<String>,
    pub retrieved_count: Option<u64>,
    pub retrieved_items: Option<Vec<Value>>,
    pub provenance: Option<Vec<String>>,
    pub cache_hit: Option<bool>,
    pub write_value: Option<Value>,
    pub memory_state_hash: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ContextualEvent {
    pub fn new(operation: ContextOperation) -> Self {
        Self {
            operation,
            source_type: None,
            source_name: None,
            query: None,
            retrieved_count: None,
            retrieved_items: None,
            provenance: None,
            cache_hit: None,
            write_value: None,
            memory_state_hash: None,
            metadata: Map::new(),
        }
    }

    /// Name the data source, e.g. `("vector_db", "docs")`.
    pub fn with_source(mut self, source_type: impl Into<String>, source_name: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self.source_name = Some(source_name.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Record retrieved items. The count reflects every item; at most
    /// [`MAX_RETRIEVED_ITEMS`] are kept.
    pub fn with_retrieved(mut self, mut items: Vec<Value>) -> Self {
        self.retrieved_count = Some(items.len() as u64);
        items.truncate(MAX_RETRIEVED_ITEMS);
        self.retrieved_items = Some(items);
        self
    }

    pub fn with_provenance<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provenance = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cache_hit(mut self, hit: bool) -> Self {
        self.cache_hit = Some(hit);
        self
    }

    pub fn with_write_value(mut self, value: impl Into<Value>) -> Self {
        self.write_value = Some(value.into());
        self
    }

    pub fn with_memory_state_hash(mut self, hash: impl Into<String>) -> Self {
        self.memory_state_hash = Some(hash.into());
        self
    }

    /// Hash a serializable memory snapshot into `memory_state_hash`.
    pub fn with_memory_state<T: Serialize>(self, state: &T) -> Result<Self, serde_json::Error> {
        let hash = hash_memory_state(state)?;
        Ok(self.with_memory_state_hash(hash))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        if let Some(items) = self.retrieved_items.as_mut() {
            if self.retrieved_count.is_none() {
                self.retrieved_count = Some(items.len() as u64);
            }
            items.truncate(MAX_RETRIEVED_ITEMS);
        }
        self
    }
}

/// SHA-256 hex digest of a serializable memory snapshot.
pub fn hash_memory_state<T: Serialize>(state: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(state)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// A surface payload. The variant determines the envelope's surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Operational(OperationalEvent),
    Cognitive(CognitiveEvent),
    Contextual(ContextualEvent),
}

impl Event {
    pub fn surface(&self) -> Surface {
        match self {
            Event::Operational(_) => Surface::Operational,
            Event::Cognitive(_) => Surface::Cognitive,
            Event::Contextual(_) => Surface::Contextual,
        }
    }
}

impl From<OperationalEvent> for Event {
    fn from(event: OperationalEvent) -> Self {
        Event::Operational(event)
    }
}

impl From<CognitiveEvent> for Event {
    fn from(event: CognitiveEvent) -> Self {
        Event::Cognitive(event)
    }
}

impl From<ContextualEvent> for Event {
    fn from(event: ContextualEvent) -> Self {
        Event::Contextual(event)
    }
}

fn truncate_thought(thought: String) -> String {
    match thought.char_indices().nth(MAX_THOUGHT_CHARS) {
        Some((cut, _)) => format!("{}{}", &thought[..cut], TRUNCATION_MARKER),
        None => thought,
    }
}

fn clamp_confidence(confidence: f64) -> Option<f64> {
    if confidence.is_nan() {
        None
    } else {
        Some(confidence.clamp(0.0, 1.0))
    }
}
