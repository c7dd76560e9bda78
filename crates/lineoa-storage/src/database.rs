// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite connection setup: PRAGMAs, WAL, migrations.
//!
//! Every statement runs on the single background thread owned by the
//! `tokio_rusqlite::Connection`, which makes [`Database`] the only writer.

use std::path::Path;

use lineoa_core::LineOaError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

/// Converts a tokio-rusqlite error into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LineOaError {
    LineOaError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database file at `path` in WAL mode.
    pub async fn open(path: &str) -> Result<Self, LineOaError> {
        Self::open_with(path, true).await
    }

    /// Opens the database file at `path`, choosing the journal mode.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, LineOaError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| LineOaError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| LineOaError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        info!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, LineOaError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| LineOaError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), LineOaError> {
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let migrated = self
            .conn
            .call(move |conn| -> Result<Result<(), String>, rusqlite::Error> {
                conn.pragma_update_and_check(None, "journal_mode", journal, |row| {
                    row.get::<_, String>(0)
                })?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(crate::migrations::run_migrations(conn).map_err(|e| e.to_string()))
            })
            .await
            .map_err(map_tr_err)?;
        migrated.map_err(|message| LineOaError::Storage {
            source: message.into(),
        })?;
        debug!(journal, "database prepared");
        Ok(())
    }

    /// The underlying connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoints the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), LineOaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
