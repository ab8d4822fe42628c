// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process sink.

use std::sync::Mutex;

use crate::error::SinkError;
use crate::event::Envelope;

use super::Sink;

/// Keeps envelopes in memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    envelopes: Mutex<Vec<Envelope>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.envelopes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn append(&self, envelope: &Envelope) -> Result<(), SinkError> {
        self.envelopes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(envelope.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Envelope>, SinkError> {
        Ok(self
            .envelopes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn clear(&self) -> Result<(), SinkError> {
        self.envelopes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
