//! SQLite-backed [`ComplaintStore`].
//!
//! Uses row-level inserts and updates instead of whole-state rewrites.
//! Mobile uniqueness is enforced by the `users` primary key; a constraint
//! violation on insert is reported as [`UserCreation::AlreadyExists`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::Row;
use tracing::{debug, instrument};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::model::{Complaint, NewComplaint, User};
use crate::store::{ComplaintStore, StatusUpdate, UserCreation};

const COMPLAINT_COLUMNS: &str =
    "id, name, mobile, location, description, category, priority, department, status, response";

/// Complaint store persisted in a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Create a store over a database whose schema is initialised.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (or create) the database file at `path` and initialise its schema.
    pub async fn open(path: impl AsRef<Path>, lock_timeout: Duration) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::open_and_init(path).await?;
        Ok(Self::new(db.with_lock_timeout(lock_timeout)))
    }

    /// In-memory database with the schema in place; nothing survives the process.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let db = Database::open_in_memory()?;
        db.init_schema().await?;
        Ok(Self::new(db))
    }
}

fn complaint_from_row(row: &Row<'_>) -> rusqlite::Result<Complaint> {
    Ok(Complaint {
        id: row.get(0)?,
        name: row.get(1)?,
        mobile: row.get(2)?,
        location: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        priority: row.get(6)?,
        department: row.get(7)?,
        status: row.get(8)?,
        response: row.get(9)?,
    })
}

#[async_trait]
impl ComplaintStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(skip(self))]
    async fn find_user(&self, name: &str, mobile: &str) -> StoreResult<Option<User>> {
        let name = name.to_owned();
        let mobile = mobile.to_owned();
        self.db
            .execute(move |conn| {
                let result = conn.query_row(
                    "SELECT name, mobile FROM users WHERE name = ?1 AND mobile = ?2",
                    rusqlite::params![name, mobile],
                    |row| Ok(User::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                );
                match result {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(StoreError::Sqlite(e)),
                }
            })
            .await
    }

    #[instrument(skip(self))]
    async fn create_user(&self, name: &str, mobile: &str) -> StoreResult<UserCreation> {
        let user = User::new(name, mobile);
        self.db
            .execute(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO users (name, mobile) VALUES (?1, ?2)",
                    rusqlite::params![user.name, user.mobile],
                );
                match inserted {
                    Ok(_) => {
                        debug!(mobile = %user.mobile, "user created");
                        Ok(UserCreation::Created(user))
                    }
                    Err(rusqlite::Error::SqliteFailure(ref err, _))
                        if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        debug!(mobile = %user.mobile, "mobile already registered");
                        Ok(UserCreation::AlreadyExists)
                    }
                    Err(e) => Err(StoreError::Sqlite(e)),
                }
            })
            .await
    }

    #[instrument(skip(self, complaint), fields(category = %complaint.category))]
    async fn create_complaint(&self, complaint: NewComplaint) -> StoreResult<Complaint> {
        // Routed once here; the database assigns the id.
        let mut record = complaint.into_complaint(0);
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO complaints \
                     (name, mobile, location, description, category, priority, department, status, response) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    rusqlite::params![
                        record.name,
                        record.mobile,
                        record.location,
                        record.description,
                        record.category,
                        record.priority,
                        record.department,
                        record.status,
                        record.response,
                    ],
                )?;
                record.id = conn.last_insert_rowid();
                debug!(id = record.id, department = %record.department, "complaint filed");
                Ok(record)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn list_complaints(&self) -> StoreResult<Vec<Complaint>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY id ASC"
                ))?;
                let rows = stmt
                    .query_map([], complaint_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: &str) -> StoreResult<StatusUpdate> {
        let status = status.to_owned();
        self.db
            .execute(move |conn| {
                let updated = conn.execute(
                    "UPDATE complaints SET status = ?2 WHERE id = ?1",
                    rusqlite::params![id, status],
                )?;
                if updated == 0 {
                    debug!(id, "status update for unknown complaint");
                    return Ok(StatusUpdate::NotFound);
                }
                Ok(StatusUpdate::Updated)
            })
            .await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
    }
}

// ── tests ────────────────────────────────────────────────────────────
