//! SQLite database setup with WAL mode and durability pragmas.
//!
//! The [`Database`] struct wraps a `rusqlite::Connection` behind an
//! `Arc<Mutex<>>` and exposes async methods that use
//! `tokio::task::spawn_blocking` to avoid blocking the async runtime.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::lock;
use crate::schema;

/// Default bound on waiting for the connection.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Thread-safe handle to a SQLite database.
///
/// All access goes through [`Database::execute`], which takes the
/// connection lock (bounded by the lock timeout) and dispatches the work
/// onto the blocking thread pool.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    lock_timeout: Duration,
}

impl Database {
    /// Open (or create) a database at `path` and apply pragmas.
    ///
    /// This call blocks briefly (file I/O), so call it during startup or
    /// from `spawn_blocking`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        Self::apply_pragmas(&conn)?;

        Ok(Self::from_connection(conn))
    }

    /// Create an in-memory database, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("opening in-memory database");

        let conn = Connection::open_in_memory()?;
        Self::apply_pragmas(&conn)?;

        Ok(Self::from_connection(conn))
    }

    /// Open the database and create any missing tables.
    pub async fn open_and_init(path: impl AsRef<Path> + Send + 'static) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = tokio::task::spawn_blocking(move || Self::open(&path)).await??;
        db.init_schema().await?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Replace the bound on waiting for the connection.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Create the `users` and `complaints` tables if they are missing.
    pub async fn init_schema(&self) -> StoreResult<()> {
        self.execute(schema::init).await
    }

    /// Execute a closure against the connection on the blocking pool.
    ///
    /// The connection stays locked until the closure returns, so each call
    /// is one exclusive unit of work.
    ///
    /// ```ignore
    /// let count: i64 = db.execute(|conn| {
    ///     Ok(conn.query_row("SELECT count(*) FROM complaints", [], |row| row.get(0))?)
    /// }).await?;
    /// ```
    pub async fn execute<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = lock::acquire(&self.conn, self.lock_timeout).await?;
        tokio::task::spawn_blocking(move || f(&*guard)).await?
    }

    // ── pragmas ──────────────────────────────────────────────────────

    fn apply_pragmas(conn: &Connection) -> StoreResult<()> {
        debug!("applying SQLite pragmas");

        // WAL mode: readers do not block the writer.
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // FULL: a committed write is on disk before the call returns.
        conn.pragma_update(None, "synchronous", "FULL")?;

        // Other processes holding the file: wait, but not forever.
        conn.pragma_update(None, "busy_timeout", 5_000_i32)?;

        info!("database pragmas applied (WAL, synchronous=FULL)");
        Ok(())
    }
}

// ── tests ────────────────────────────────────────────────────────────
