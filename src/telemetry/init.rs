// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Console subscriber initialization.

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::InstrumentationConfig;

/// Target of the per-envelope console echo.
pub const ECHO_TARGET: &str = "alog";

/// Target of spans exported by the tracing backend.
pub const SPAN_TARGET: &str = "alog::span";

/// Most verbose level allowed for targets outside alog.
const OTHER_TARGETS_LEVEL: Level = Level::WARN;

/// Console settings for alog's own diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Minimum level of the envelope echo and internal diagnostics.
    pub level: Level,

    /// Print exported envelope spans when they close.
    pub show_spans: bool,

    /// Include source file and line in each line.
    pub include_file_line: bool,

    pub ansi_colors: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            show_spans: false,
            include_file_line: false,
            ansi_colors: true,
        }
    }
}

impl ConsoleConfig {
    /// Console settings matching an instrumentation config: the configured
    /// envelope level gates the echo, and spans are shown when tracing is on.
    pub fn from_instrumentation(config: &InstrumentationConfig) -> Self {
        Self {
            level: config.level.as_tracing(),
            show_spans: config.enable_tracing,
            ..Self::default()
        }
    }

    /// Everything alog emits, spans included, with source locations.
    pub fn with_debug(mut self) -> Self {
        self.level = Level::DEBUG;
        self.show_spans = true;
        self.include_file_line = true;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    /// The `EnvFilter` directive used when `RUST_LOG` is unset. Targets
    /// outside alog never log below WARN.
    pub fn directive(&self) -> String {
        let span_level = if self.show_spans {
            self.level.to_string()
        } else {
            "off".to_string()
        };
        format!(
            "{},{}={},{}={}",
            OTHER_TARGETS_LEVEL.min(self.level),
            ECHO_TARGET,
            self.level,
            SPAN_TARGET,
            span_level
        )
        .to_lowercase()
    }
}

/// Install the global console subscriber.
///
/// `RUST_LOG` takes precedence over [`ConsoleConfig::directive`].
/// Fails if a global subscriber is already set.
pub fn init_console(config: &ConsoleConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directive()))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let span_events = if config.show_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_ansi(config.ansi_colors)
                .with_file(config.include_file_line)
                .with_line_number(config.include_file_line)
                .with_span_events(span_events),
        )
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Level as EnvelopeLevel;

    #[test]
    fn test_from_instrumentation() {
        let config = InstrumentationConfig::default()
            .with_level(EnvelopeLevel::Critical)
            .with_tracing(true);
        let console = ConsoleConfig::from_instrumentation(&config);
        assert_eq!(console.level, Level::ERROR);
        assert!(console.show_spans);
    }

    #[test]
    fn test_directive_follows_configured_level() {
        let config = InstrumentationConfig::default().with_level(EnvelopeLevel::Warning);
        let directive = ConsoleConfig::from_instrumentation(&config).directive();
        assert_eq!(directive, "warn,alog=warn,alog::span=off");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_directive_never_raises_other_targets_above_warn() {
        let config = InstrumentationConfig::default().with_level(EnvelopeLevel::Debug);
        let directive = ConsoleConfig::from_instrumentation(&config).directive();
        assert_eq!(directive, "warn,alog=debug,alog::span=off");
    }

    #[test]
    fn test_spans_enabled_with_tracing() {
        let config = InstrumentationConfig::default().with_tracing(true);
        let directive = ConsoleConfig::from_instrumentation(&config).directive();
        assert_eq!(directive, "warn,alog=info,alog::span=info");
    }

    #[test]
    fn test_debug_overrides_configured_level() {
        let config = InstrumentationConfig::default().with_level(EnvelopeLevel::Error);
        let console = ConsoleConfig::from_instrumentation(&config).with_debug().with_ansi(false);
        assert_eq!(console.level, Level::DEBUG);
        assert!(console.show_spans);
        assert!(!console.ansi_colors);
        assert_eq!(console.directive(), "warn,alog=debug,alog::span=debug");
    }
}
