// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use super::types::{ConfigFile, InstrumentationConfig};

/// Merge configuration layers with precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment overrides
/// 2. Workspace config (.alog.yaml, .alog.yml, .alog.json)
/// 3. Global config (~/.alog/config.yaml)
/// 4. Default values
pub fn merge_config(
    global: Option<ConfigFile>,
    workspace: Option<ConfigFile>,
    env: ConfigFile,
) -> InstrumentationConfig {
    let mut result = InstrumentationConfig::default();

    if let Some(config) = global {
        apply_config_file(&mut result, config);
    }

    if let Some(config) = workspace {
        apply_config_file(&mut result, config);
    }

    apply_config_file(&mut result, env);

    result
}

/// Overlay every field set in `config` onto `result`.
pub fn apply_config_file(result: &mut InstrumentationConfig, config: ConfigFile) {
    if let Some(dir) = config.output_directory {
        result.output_directory = dir;
    }

    if let Some(level) = config.level {
        result.level = level;
    }

    if let Some(enabled) = config.enable_tracing {
        result.enable_tracing = enabled;
    }

    if let Some(persist) = config.persist_contextual {
        result.persist_contextual = persist;
    }

    if let Some(targets) = config.auto_instrument_targets {
        // Merge target lists
        for target in targets {
            if !result.auto_instrument_targets.contains(&target) {
                result.auto_instrument_targets.push(target);
            }
        }
    }

    if let Some(name) = config.service_name {
        result.service_name = name;
    }

    if let Some(endpoint) = config.tracing_endpoint {
        result.tracing_endpoint = endpoint;
    }
}
