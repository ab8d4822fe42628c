// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The global entry point before initialization.

use alog::error::InstrumentError;
use alog::global;
use alog::Instrumentable;

#[derive(Debug)]
struct Idle;

impl Instrumentable for Idle {
    fn operations(&self) -> &'static [&'static str] {
        &["run"]
    }
}

#[test]
fn test_instrument_before_init_fails() {
    assert!(!global::is_initialized());
    assert!(global::logger().is_none());

    let err = global::instrument_agent(Idle, "idle", None).unwrap_err();
    match err {
        InstrumentError::NotInitialized { agent } => assert_eq!(agent, "idle"),
    }
    assert!(global::shutdown().is_none());
}
