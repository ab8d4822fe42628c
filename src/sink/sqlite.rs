// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SQLite-based envelope sink.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{params, Connection};

use crate::error::SinkError;
use crate::event::{Envelope, Surface};

use super::Sink;

/// Stores the envelopes of one surface in a shared SQLite database.
///
/// All surfaces may point at the same file; rows are tagged by surface.
/// Envelope fields are denormalized into columns for ad-hoc queries, and the
/// full envelope is kept as JSON for lossless read-back.
pub struct SqliteSink {
    conn: Mutex<Connection>,
    path: PathBuf,
    surface: Surface,
}

impl SqliteSink {
    /// Open or create the database at `path` for `surface`.
    pub fn open(path: &Path, surface: Surface) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            surface,
        })
    }

    /// Open an in-memory database. Each call gets a private database.
    pub fn in_memory(surface: Surface) -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(":memory:"),
            surface,
        })
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Envelopes of this surface belonging to `trace_id`, in append order.
    pub fn read_trace(&self, trace_id: &str) -> Result<Vec<Envelope>, SinkError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT record FROM envelopes WHERE surface = ?1 AND trace_id = ?2 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![self.surface.as_str(), trace_id], |row| {
            row.get::<_, String>(0)
        })?;
        decode_rows(rows)
    }
}

fn init_schema(conn: &Connection) -> Result<(), SinkError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS envelopes (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            timestamp TEXT NOT NULL,
            agent TEXT NOT NULL,
            surface TEXT NOT NULL,
            level TEXT NOT NULL,
            trace_id TEXT NOT NULL,
            span_id TEXT NOT NULL,
            event TEXT NOT NULL,
            record TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_envelopes_surface ON envelopes(surface, seq);
        CREATE INDEX IF NOT EXISTS idx_envelopes_trace ON envelopes(trace_id);
        "#,
    )?;
    Ok(())
}

fn decode_rows<I>(rows: I) -> Result<Vec<Envelope>, SinkError>
where
    I: Iterator<Item = rusqlite::Result<String>>,
{
    rows.map(|row| {
        let record = row?;
        serde_json::from_str(&record).map_err(|e| SinkError::Decode {
            location: "envelopes.record".to_string(),
            message: e.to_string(),
        })
    })
    .collect()
}

impl Sink for SqliteSink {
    fn append(&self, envelope: &Envelope) -> Result<(), SinkError> {
        let event =
            serde_json::to_string(envelope.event()).map_err(|e| SinkError::Encode(e.to_string()))?;
        let record =
            serde_json::to_string(envelope).map_err(|e| SinkError::Encode(e.to_string()))?;

        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            r#"
            INSERT INTO envelopes (
                id, timestamp, agent, surface, level, trace_id, span_id, event, record
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                envelope.id().as_str(),
                envelope.timestamp().to_rfc3339(),
                envelope.agent(),
                envelope.surface().as_str(),
                envelope.level().as_str(),
                envelope.trace_id().as_str(),
                envelope.span_id().as_str(),
                event,
                record,
            ],
        )?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Envelope>, SinkError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare("SELECT record FROM envelopes WHERE surface = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![self.surface.as_str()], |row| row.get::<_, String>(0))?;
        decode_rows(rows)
    }

    fn clear(&self) -> Result<(), SinkError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "DELETE FROM envelopes WHERE surface = ?1",
            params![self.surface.as_str()],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}#{}", self.path.display(), self.surface)
    }
}
