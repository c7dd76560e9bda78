// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value record operations on the `records` table.

use chrono::Utc;
use lineoa_core::LineOaError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};

/// Reads the value stored under `key`.
pub async fn read_record(db: &Database, key: &str) -> Result<Option<String>, LineOaError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Inserts or replaces the value stored under `key`.
pub async fn write_record(db: &Database, key: &str, value: &str) -> Result<(), LineOaError> {
    let key = key.to_string();
    let value = value.to_string();
    let now = Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_none() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(read_record(&db, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_overwrites_existing_value() {
        let db = Database::open_in_memory().await.unwrap();
        write_record(&db, "k", "[1]").await.unwrap();
        write_record(&db, "k", "[2]").await.unwrap();
        assert_eq!(read_record(&db, "k").await.unwrap().as_deref(), Some("[2]"));
    }
}
