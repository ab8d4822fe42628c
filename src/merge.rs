// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Offline merging and grouping of persisted logs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SinkError;
use crate::event::{Envelope, OperationStatus, Surface};
use crate::sink::read_jsonl;
use crate::trace::TraceId;

/// Per-surface files present in `dir`, in surface order.
pub fn surface_files(dir: &Path) -> Vec<PathBuf> {
    Surface::ALL
        .iter()
        .map(|surface| dir.join(surface.file_name()))
        .filter(|path| path.is_file())
        .collect()
}

/// Every envelope in the given files, stable-sorted by timestamp.
pub fn load_sorted<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<Envelope>, SinkError> {
    let mut envelopes = Vec::new();
    for input in inputs {
        let loaded = read_jsonl(input.as_ref())?;
        debug!(input = %input.as_ref().display(), count = loaded.len(), "Loaded log file");
        envelopes.extend(loaded);
    }
    envelopes.sort_by_key(|e| e.timestamp());
    Ok(envelopes)
}

/// Merge JSONL files into one, ordered by timestamp.
///
/// Envelopes with equal timestamps keep their input order. Inputs are never
/// modified; an output path naming one of the inputs is rejected. Returns the
/// number of envelopes written.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: &Path) -> Result<usize, SinkError> {
    if let Some(input) = inputs.iter().find(|i| same_file(i.as_ref(), output)) {
        return Err(SinkError::OutputIsInput(input.as_ref().to_path_buf()));
    }

    let envelopes = load_sorted(inputs)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output)?);
    for envelope in &envelopes {
        let line =
            serde_json::to_string(envelope).map_err(|e| SinkError::Encode(e.to_string()))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!(
        inputs = inputs.len(),
        count = envelopes.len(),
        output = %output.display(),
        "Merged logs"
    );
    Ok(envelopes.len())
}

/// Merge the per-surface files of a log directory.
pub fn merge_directory(dir: &Path, output: &Path) -> Result<usize, SinkError> {
    merge_files(&surface_files(dir), output)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Summary of the envelopes sharing one trace id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    pub trace_id: TraceId,
    /// Agents in order of first appearance.
    pub agents: Vec<String>,
    pub operational: usize,
    pub cognitive: usize,
    pub contextual: usize,
    /// Operational envelopes with status `error`.
    pub errors: usize,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
}

impl TraceSummary {
    fn new(envelope: &Envelope) -> Self {
        Self {
            trace_id: envelope.trace_id().clone(),
            agents: Vec::new(),
            operational: 0,
            cognitive: 0,
            contextual: 0,
            errors: 0,
            first_timestamp: envelope.timestamp(),
            last_timestamp: envelope.timestamp(),
        }
    }

    fn add(&mut self, envelope: &Envelope) {
        if !self.agents.iter().any(|a| a == envelope.agent()) {
            self.agents.push(envelope.agent().to_string());
        }
        match envelope.surface() {
            Surface::Operational => self.operational += 1,
            Surface::Cognitive => self.cognitive += 1,
            Surface::Contextual => self.contextual += 1,
        }
        if envelope
            .operational()
            .is_some_and(|o| o.status == OperationStatus::Error)
        {
            self.errors += 1;
        }
        self.first_timestamp = self.first_timestamp.min(envelope.timestamp());
        self.last_timestamp = self.last_timestamp.max(envelope.timestamp());
    }

    pub fn total(&self) -> usize {
        self.operational + self.cognitive + self.contextual
    }
}

/// Group envelopes by trace id, ordered by each trace's first timestamp.
pub fn group_by_trace(envelopes: &[Envelope]) -> Vec<TraceSummary> {
    let mut index: HashMap<&TraceId, usize> = HashMap::new();
    let mut groups: Vec<TraceSummary> = Vec::new();

    for envelope in envelopes {
        let slot = *index.entry(envelope.trace_id()).or_insert_with(|| {
            groups.push(TraceSummary::new(envelope));
            groups.len() - 1
        });
        groups[slot].add(envelope);
    }

    groups.sort_by_key(|g| g.first_timestamp);
    groups
}
