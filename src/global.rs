// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Process-wide logger.
//!
//! Most applications configure one logger at startup and instrument their
//! agents against it:
//!
//! ```rust,ignore
//! alog::global::init(alog::config::load_config(Path::new("."))?)?;
//! let planner = alog::global::instrument_agent(Planner::new(), "planner", None)?;
//! ```

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::info;

use crate::config::InstrumentationConfig;
use crate::error::{ConfigError, InstrumentError};
use crate::instrument::{instrument, Instrumentable, Instrumented};
use crate::logger::Logger;

static GLOBAL_LOGGER: Lazy<RwLock<Option<Arc<Logger>>>> = Lazy::new(|| RwLock::new(None));

/// Create the global logger from `config`, replacing any previous one.
///
/// Handles created against a replaced logger keep recording to it.
pub fn init(config: InstrumentationConfig) -> Result<Arc<Logger>, ConfigError> {
    let logger = Arc::new(Logger::from_config(&config)?);

    *GLOBAL_LOGGER.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&logger));

    info!(
        output_directory = %config.output_directory.display(),
        tracing = config.enable_tracing,
        endpoint = ?config.enable_tracing.then_some(config.tracing_endpoint.as_str()),
        persist_contextual = config.persist_contextual,
        "alog initialized"
    );
    Ok(logger)
}

/// The global logger, if initialized.
pub fn logger() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

pub fn is_initialized() -> bool {
    logger().is_some()
}

/// Instrument `target` against the global logger.
pub fn instrument_agent<T: Instrumentable>(
    target: T,
    name: &str,
    methods: Option<&[&str]>,
) -> Result<Instrumented<T>, InstrumentError> {
    let logger = logger().ok_or_else(|| InstrumentError::NotInitialized {
        agent: name.to_string(),
    })?;
    Ok(instrument(logger, target, name, methods))
}

/// Remove the global logger and return it.
pub fn shutdown() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER
        .write()
        .unwrap_or_else(|e| e.into_inner())
        .take()
}
