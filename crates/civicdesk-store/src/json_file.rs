//! Flat-file [`ComplaintStore`] keeping the whole state in one JSON file.
//!
//! Every mutation is a full load-mutate-save cycle performed while holding
//! the store's exclusive lock. Saves go to a temporary file in the same
//! directory which is fsynced and then renamed over the target, so
//! readers see either the old or the new state, never a torn write.
//!
//! A missing file is an empty state. A file that exists but cannot be
//! read or parsed is a storage failure.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::db::DEFAULT_LOCK_TIMEOUT;
use crate::error::{StoreError, StoreResult};
use crate::lock;
use crate::model::{Complaint, NewComplaint, User};
use crate::snapshot::{Mutation, Snapshot};
use crate::store::{ComplaintStore, StatusUpdate, UserCreation};

/// Complaint store persisted as a single JSON document.
#[derive(Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
    lock_timeout: Duration,
}

impl JsonFileStore {
    /// Use the file at `path`; it is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!(path = %path.display(), "using JSON file store");
        Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Replace the bound on waiting for exclusive access.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current state without taking the lock.
    async fn read<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(Snapshot) -> T + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || load(&path).map(f)).await?
    }

    /// Load, apply `f`, and save if `f` changed anything, all under the lock.
    async fn mutate<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Snapshot) -> Mutation<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = lock::acquire(&self.lock, self.lock_timeout).await?;
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let mut snapshot = load(&path)?;
            let Mutation { outcome, dirty } = f(&mut snapshot);
            if dirty {
                save(&path, &snapshot)?;
            }
            Ok(outcome)
        })
        .await?
    }
}

// ── file I/O ─────────────────────────────────────────────────────────

fn load(path: &Path) -> StoreResult<Snapshot> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "state file absent, starting empty");
            Ok(Snapshot::default())
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn save(path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    serde_json::to_writer_pretty(&mut tmp, snapshot)?;
    tmp.write_all(b"\n").map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    sync_dir(dir)?;

    debug!(
        path = %path.display(),
        users = snapshot.users.len(),
        complaints = snapshot.complaints.len(),
        "state saved"
    );
    Ok(())
}

/// Flush the directory entry so the rename itself survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> StoreResult<()> {
    std::fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| StoreError::io(dir, e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> StoreResult<()> {
    Ok(())
}

// ── ComplaintStore ───────────────────────────────────────────────────

#[async_trait]
impl ComplaintStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    #[instrument(skip(self))]
    async fn find_user(&self, name: &str, mobile: &str) -> StoreResult<Option<User>> {
        let name = name.to_owned();
        let mobile = mobile.to_owned();
        self.read(move |snapshot| snapshot.find_user(&name, &mobile))
            .await
    }

    #[instrument(skip(self))]
    async fn create_user(&self, name: &str, mobile: &str) -> StoreResult<UserCreation> {
        let name = name.to_owned();
        let mobile = mobile.to_owned();
        self.mutate(move |snapshot| snapshot.create_user(&name, &mobile))
            .await
    }

    #[instrument(skip(self, complaint), fields(category = %complaint.category))]
    async fn create_complaint(&self, complaint: NewComplaint) -> StoreResult<Complaint> {
        self.mutate(move |snapshot| snapshot.create_complaint(complaint))
            .await
    }

    #[instrument(skip(self))]
    async fn list_complaints(&self) -> StoreResult<Vec<Complaint>> {
        self.read(|snapshot| snapshot.complaints).await
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: &str) -> StoreResult<StatusUpdate> {
        let status = status.to_owned();
        self.mutate(move |snapshot| snapshot.update_status(id, &status))
            .await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.read(|_| ()).await
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn water_complaint() -> NewComplaint {
        NewComplaint {
            name: "Bob".into(),
            mobile: "1112223333".into(),
            location: "Ward 12".into(),
            description: "Burst pipe".into(),
            category: "water".into(),
            priority: "High".into(),
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));

        assert!(store.list_complaints().await.unwrap().is_empty());
        assert!(store.find_user("Alice", "9876543210").await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn writes_users_then_complaints_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::new(&path);

        store.create_user("Bob", "1112223333").await.unwrap();
        store.create_complaint(water_complaint()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["users"][0]["mobile"], "1112223333");
        assert_eq!(raw["complaints"][0]["id"], 1);
        assert_eq!(raw["complaints"][0]["location"], "Ward 12");
        assert_eq!(raw["complaints"][0]["department"], "Water Dept");
        assert_eq!(raw["complaints"][0]["status"], "Pending");
    }

    #[tokio::test]
    async fn reads_state_written_by_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"users": [{"name": "Alice", "mobile": "9876543210"}], "complaints": []}"#,
        )
        .unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.find_user("Alice", "9876543210").await.unwrap().is_some());
        assert!(!store.seed_default_user().await.unwrap());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.list_complaints().await,
            Err(StoreError::Json(_))
        ));
        assert!(store.create_user("Bob", "1").await.is_err());
        // The broken file is left untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[tokio::test]
    async fn directory_in_place_of_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(matches!(
            store.health_check().await,
            Err(StoreError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn not_found_update_does_not_rewrite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::new(&path);
        store.create_complaint(water_complaint()).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let outcome = store.update_status(5, "Resolved").await.unwrap();
        assert_eq!(outcome, StatusUpdate::NotFound);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_complaints() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_complaint(water_complaint()).await.unwrap().id
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<i64>>());
        assert_eq!(store.list_complaints().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn mutation_times_out_while_locked() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"))
            .with_lock_timeout(Duration::from_millis(20));
        let _held = Arc::clone(&store.lock).lock_owned().await;

        let err = store.create_user("Bob", "1").await.unwrap_err();
        assert!(matches!(err, StoreError::Busy { .. }));
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("state.json");

        let err = save(&path, &Snapshot::default()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_save_leaves_previous_state_intact() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = JsonFileStore::new(&path);
        store.create_user("Bob", "1112223333").await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let set_mode = |mode| {
            std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(mode)).unwrap()
        };
        set_mode(0o555);
        // Privileged users ignore directory permissions; nothing to check then.
        if std::fs::File::create(dir.path().join("writable-check")).is_ok() {
            set_mode(0o755);
            return;
        }

        let err = store.create_user("Carol", "4445556666").await.unwrap_err();
        set_mode(0o755);

        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert!(store.find_user("Carol", "4445556666").await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn directory_sync_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        sync_dir(dir.path()).unwrap();

        let gone = dir.path().join("gone");
        assert!(matches!(sync_dir(&gone), Err(StoreError::Io { .. })));
    }
}
