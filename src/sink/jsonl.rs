// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Line-delimited JSON file sink.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::SinkError;
use crate::event::Envelope;

use super::Sink;

/// Appends one JSON-encoded envelope per line to a file.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSink {
    /// Create a sink writing to `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for JsonlSink {
    fn append(&self, envelope: &Envelope) -> Result<(), SinkError> {
        let mut line =
            serde_json::to_string(envelope).map_err(|e| SinkError::Encode(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Envelope>, SinkError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        read_jsonl(&self.path)
    }

    fn clear(&self) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read every envelope from a JSONL file.
///
/// A missing file reads as empty. Blank lines are ignored; malformed lines
/// are skipped with a warning so that one bad record does not hide the rest.
pub fn read_jsonl(path: &Path) -> Result<Vec<Envelope>, SinkError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut envelopes = Vec::new();
    for (idx, bytes) in BufReader::new(file).split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = idx + 1,
                    error = %e,
                    "Skipping envelope with invalid UTF-8"
                );
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Envelope>(line) {
            Ok(envelope) => envelopes.push(envelope),
            Err(e) => warn!(
                path = %path.display(),
                line = idx + 1,
                error = %e,
                "Skipping malformed envelope"
            ),
        }
    }
    Ok(envelopes)
}
