// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied on every open.

use lineoa_core::LineOaError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies pending migrations. Refinery records progress in
/// `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LineOaError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| LineOaError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
