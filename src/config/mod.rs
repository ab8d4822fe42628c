// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for alog.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.alog/config.yaml
//! - Workspace config: .alog.yaml, .alog.yml, or .alog.json
//! - Environment: ALOG_* variables
//!
//! Configuration is merged with precedence (env > workspace > global > defaults).

mod env;
mod loader;
mod merger;
mod types;

pub use env::{
    overrides_from, overrides_from_env, ENV_ENABLE_OTEL, ENV_ENABLE_TRACING, ENV_LEVEL,
    ENV_OTEL_ENDPOINT, ENV_OUTPUT_DIR, ENV_PERSIST_CONTEXTUAL,
};

pub use loader::{
    get_global_config_dir, get_global_config_path, load_config_file, load_global_config,
    load_workspace_config, save_config, CONFIG_FILES, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE,
};

pub use merger::{apply_config_file, merge_config};

pub use types::{
    ConfigFile, InstrumentationConfig, DEFAULT_OUTPUT_DIRECTORY, DEFAULT_SERVICE_NAME,
    DEFAULT_TRACING_ENDPOINT,
};

use crate::error::ConfigError;
use std::path::Path;

/// Load, merge and validate all configuration sources for a workspace.
pub fn load_config(workspace_root: &Path) -> Result<InstrumentationConfig, ConfigError> {
    load_config_with(workspace_root, overrides_from_env()?)
}

/// Like [`load_config`] with explicit overrides in place of the environment.
pub fn load_config_with(
    workspace_root: &Path,
    overrides: ConfigFile,
) -> Result<InstrumentationConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = load_workspace_config(workspace_root)?;

    let config = merge_config(global, workspace, overrides);
    config.validate()?;
    Ok(config)
}
