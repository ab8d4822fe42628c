// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Console output for alog's own diagnostics.
//!
//! The library only emits `tracing` events; it never installs a subscriber.
//! Binaries and embedding applications call [`init_console`] once at startup:
//!
//! ```rust,ignore
//! use alog::telemetry::{init_console, ConsoleConfig};
//!
//! init_console(&ConsoleConfig::from_instrumentation(&config))?;
//! ```
//!
//! Operational envelopes are echoed under the `alog` target and exported
//! envelope spans under `alog::span`, so both can be filtered with `RUST_LOG`.

mod init;

pub use init::{init_console, ConsoleConfig, ECHO_TARGET, SPAN_TARGET};
