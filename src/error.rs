// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for alog.
//!
//! This module provides strongly-typed errors for the different parts of the
//! crate, using `thiserror` for ergonomic error definitions and `anyhow` for
//! error propagation in the binary.
//!
//! Note that none of these errors ever escape an instrumented call: sink and
//! bridge failures inside the record path are logged and swallowed. They are
//! surfaced only by the read, clear, merge and configuration APIs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or applying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Sink initialization failed: {0}")]
    Sink(#[from] SinkError),
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Errors raised by a sink while appending, reading or clearing envelopes.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode envelope: {0}")]
    Encode(String),

    #[error("Malformed envelope at {location}: {message}")]
    Decode { location: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Refusing to overwrite input file: {}", .0.display())]
    OutputIsInput(PathBuf),
}

impl From<rusqlite::Error> for SinkError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// A single span attribute could not be represented by the tracing backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("value of type {type_name} is not representable as a span attribute")]
    Unrepresentable { type_name: &'static str },

    #[error("failed to encode {type_name} as JSON: {message}")]
    Encode {
        type_name: &'static str,
        message: String,
    },
}

impl SerializationError {
    /// Name of the type whose value could not be converted.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unrepresentable { type_name } | Self::Encode { type_name, .. } => type_name,
        }
    }
}

/// Errors raised by the span bridge or its backend.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to encode event payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Tracing backend rejected span {span}: {message}")]
    Backend { span: String, message: String },
}

impl BridgeError {
    /// Create a backend failure for the given span.
    pub fn backend(span: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            span: span.into(),
            message: message.into(),
        }
    }
}

/// Errors from the instrumentation entry points.
#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error("alog is not initialized; call alog::global::init() before instrumenting {agent}")]
    NotInitialized { agent: String },
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::NotFound(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_config_error_from_json() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: ConfigError = result.unwrap_err().into();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_serialization_error_type_name() {
        let err = SerializationError::Unrepresentable { type_name: "u64" };
        assert_eq!(err.type_name(), "u64");
        assert!(err.to_string().contains("u64"));
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::OutputIsInput(PathBuf::from("logs/operational.jsonl"));
        assert!(err.to_string().contains("operational.jsonl"));
    }

    #[test]
    fn test_instrument_error_names_agent() {
        let err = InstrumentError::NotInitialized {
            agent: "planner".to_string(),
        };
        assert!(err.to_string().contains("planner"));
    }
}
