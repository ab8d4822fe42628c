// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Environment variable overrides.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::event::Level;

use super::types::ConfigFile;

pub const ENV_OUTPUT_DIR: &str = "ALOG_OUTPUT_DIR";
pub const ENV_LEVEL: &str = "ALOG_LEVEL";
pub const ENV_ENABLE_OTEL: &str = "ALOG_ENABLE_OTEL";
pub const ENV_ENABLE_TRACING: &str = "ALOG_ENABLE_TRACING";
pub const ENV_OTEL_ENDPOINT: &str = "ALOG_OTEL_ENDPOINT";
pub const ENV_PERSIST_CONTEXTUAL: &str = "ALOG_PERSIST_CONTEXTUAL";

/// Read overrides from the process environment.
pub fn overrides_from_env() -> Result<ConfigFile, ConfigError> {
    overrides_from(|key| std::env::var(key).ok())
}

/// Read overrides through `lookup`. Unset or empty variables are ignored.
///
/// Boolean flags are on for `true`, `1` or `yes` (any case) and off for any
/// other value.
pub fn overrides_from<F>(lookup: F) -> Result<ConfigFile, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let level = match get(ENV_LEVEL) {
        Some(raw) => Some(
            raw.parse::<Level>()
                .map_err(|e| ConfigError::invalid(ENV_LEVEL, e))?,
        ),
        None => None,
    };

    let enable_tracing = match (get(ENV_ENABLE_OTEL), get(ENV_ENABLE_TRACING)) {
        (Some(raw), _) | (None, Some(raw)) => Some(parse_flag(&raw)),
        (None, None) => None,
    };

    Ok(ConfigFile {
        output_directory: get(ENV_OUTPUT_DIR).map(PathBuf::from),
        level,
        enable_tracing,
        persist_contextual: get(ENV_PERSIST_CONTEXTUAL).map(|raw| parse_flag(&raw)),
        auto_instrument_targets: None,
        service_name: None,
        tracing_endpoint: get(ENV_OTEL_ENDPOINT),
    })
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
