//! Table definitions for the SQLite backend.
//!
//! The schema is created with `IF NOT EXISTS` on every open, so opening an
//! existing database is a no-op and a fresh file gets both tables.

use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreResult;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        name   TEXT NOT NULL,
        mobile TEXT NOT NULL PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS complaints (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        mobile      TEXT NOT NULL,
        location    TEXT NOT NULL,
        description TEXT NOT NULL,
        category    TEXT NOT NULL,
        priority    TEXT NOT NULL,
        department  TEXT NOT NULL,
        status      TEXT NOT NULL,
        response    TEXT NOT NULL
    );
"#;

/// Create the `users` and `complaints` tables if they are missing.
///
/// Synchronous; call it from `spawn_blocking`.
pub fn init(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)?;
    debug!("schema ready");
    Ok(())
}
