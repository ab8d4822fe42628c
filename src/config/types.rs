// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! [`ConfigFile`] is what a single JSON or YAML file may contain; every field
//! is optional so files can be layered. [`InstrumentationConfig`] is the
//! resolved result handed to the logger.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::Level;

/// Default directory for the per-surface log files.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "logs";

/// Default service name reported on exported spans.
pub const DEFAULT_SERVICE_NAME: &str = "alog-agent";

/// Default collector endpoint.
pub const DEFAULT_TRACING_ENDPOINT: &str = "http://localhost:4317";

/// One configuration file. Can be `.alog.yaml`, `.alog.yml` or `.alog.json`
/// in the workspace root, or `~/.alog/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_tracing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_contextual: Option<bool>,

    /// Agent classes to instrument automatically, by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_instrument_targets: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing_endpoint: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Directory holding `operational.jsonl`, `cognitive.jsonl` and
    /// (optionally) `contextual.jsonl`.
    pub output_directory: PathBuf,

    /// Minimum level echoed to the console.
    pub level: Level,

    /// Export every envelope as a span.
    pub enable_tracing: bool,

    /// Persist contextual envelopes.
    pub persist_contextual: bool,

    pub auto_instrument_targets: Vec<String>,

    pub service_name: String,

    pub tracing_endpoint: String,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            level: Level::Info,
            enable_tracing: false,
            persist_contextual: false,
            auto_instrument_targets: Vec::new(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            tracing_endpoint: DEFAULT_TRACING_ENDPOINT.to_string(),
        }
    }
}

impl InstrumentationConfig {
    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = dir.into();
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    pub fn with_persist_contextual(mut self, persist: bool) -> Self {
        self.persist_contextual = persist;
        self
    }

    /// Whether `agent` is listed for automatic instrumentation.
    pub fn should_auto_instrument(&self, agent: &str) -> bool {
        self.auto_instrument_targets.iter().any(|t| t == agent)
    }

    /// Check values that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_directory.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output_directory", "must not be empty"));
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::invalid("service_name", "must not be empty"));
        }
        if self.enable_tracing && self.tracing_endpoint.trim().is_empty() {
            return Err(ConfigError::invalid(
                "tracing_endpoint",
                "must not be empty when tracing is enabled",
            ));
        }
        Ok(())
    }
}
