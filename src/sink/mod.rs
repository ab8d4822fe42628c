// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Append-only envelope persistence.
//!
//! A [`Sink`] stores the envelopes of one surface. The default is
//! [`JsonlSink`], one line-delimited JSON file per surface. [`MemorySink`]
//! keeps envelopes in process and [`SqliteSink`] writes them to a relational
//! table.

mod jsonl;
mod memory;
mod sqlite;

use std::path::Path;

pub use jsonl::{read_jsonl, JsonlSink};
pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use crate::error::SinkError;
use crate::event::{Envelope, Surface};

/// Append-only persistence target for the envelopes of one surface.
///
/// Implementations must serialize concurrent appends so that records never
/// interleave.
pub trait Sink: Send + Sync {
    /// Append one envelope.
    fn append(&self, envelope: &Envelope) -> Result<(), SinkError>;

    /// Every envelope appended since the last clear, in append order.
    fn read_all(&self) -> Result<Vec<Envelope>, SinkError>;

    /// Remove every stored envelope.
    fn clear(&self) -> Result<(), SinkError>;

    /// Human-readable location, used in diagnostics.
    fn describe(&self) -> String;
}

/// The sinks configured for a logger, one per persisted surface.
pub struct SinkSet {
    operational: Box<dyn Sink>,
    cognitive: Box<dyn Sink>,
    contextual: Option<Box<dyn Sink>>,
}

impl SinkSet {
    pub fn new(
        operational: Box<dyn Sink>,
        cognitive: Box<dyn Sink>,
        contextual: Option<Box<dyn Sink>>,
    ) -> Self {
        Self {
            operational,
            cognitive,
            contextual,
        }
    }

    /// Per-surface JSONL files under `dir`.
    pub fn jsonl(dir: &Path, persist_contextual: bool) -> Result<Self, SinkError> {
        std::fs::create_dir_all(dir)?;
        let sink = |surface: Surface| -> Box<dyn Sink> {
            Box::new(JsonlSink::new(dir.join(surface.file_name())))
        };

        Ok(Self::new(
            sink(Surface::Operational),
            sink(Surface::Cognitive),
            persist_contextual.then(|| sink(Surface::Contextual)),
        ))
    }

    /// In-memory sinks.
    pub fn memory(persist_contextual: bool) -> Self {
        Self::new(
            Box::new(MemorySink::new()),
            Box::new(MemorySink::new()),
            persist_contextual.then(|| Box::new(MemorySink::new()) as Box<dyn Sink>),
        )
    }

    /// All surfaces in one SQLite database at `path`.
    pub fn sqlite(path: &Path, persist_contextual: bool) -> Result<Self, SinkError> {
        let contextual = if persist_contextual {
            Some(Box::new(SqliteSink::open(path, Surface::Contextual)?) as Box<dyn Sink>)
        } else {
            None
        };

        Ok(Self::new(
            Box::new(SqliteSink::open(path, Surface::Operational)?),
            Box::new(SqliteSink::open(path, Surface::Cognitive)?),
            contextual,
        ))
    }

    /// The sink for `surface`, if that surface is persisted.
    pub fn get(&self, surface: Surface) -> Option<&dyn Sink> {
        match surface {
            Surface::Operational => Some(self.operational.as_ref()),
            Surface::Cognitive => Some(self.cognitive.as_ref()),
            Surface::Contextual => self.contextual.as_deref(),
        }
    }

    /// Persisted surfaces with their sinks, in sink order.
    pub fn configured(&self) -> impl Iterator<Item = (Surface, &dyn Sink)> {
        Surface::ALL
            .into_iter()
            .filter_map(move |surface| self.get(surface).map(|sink| (surface, sink)))
    }

    pub fn persists(&self, surface: Surface) -> bool {
        self.get(surface).is_some()
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSet")
            .field("operational", &self.operational.describe())
            .field("cognitive", &self.cognitive.describe())
            .field("contextual", &self.contextual.as_ref().map(|s| s.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_jsonl_set_layout() {
        let temp = TempDir::new().unwrap();
        let set = SinkSet::jsonl(temp.path(), false).unwrap();
        assert!(set.persists(Surface::Operational));
        assert!(set.persists(Surface::Cognitive));
        assert!(!set.persists(Surface::Contextual));
        assert!(set
            .get(Surface::Cognitive)
            .unwrap()
            .describe()
            .ends_with("cognitive.jsonl"));
    }

    #[test]
    fn test_configured_order() {
        let set = SinkSet::memory(true);
        let surfaces: Vec<Surface> = set.configured().map(|(s, _)| s).collect();
        assert_eq!(surfaces, Surface::ALL.to_vec());

        let set = SinkSet::memory(false);
        assert_eq!(set.configured().count(), 2);
    }
}
