//! In-process [`ComplaintStore`] with no persistence.
//!
//! Shares its contract logic with [`JsonFileStore`](crate::JsonFileStore)
//! through the common snapshot type; useful for tests and throwaway runs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::instrument;

use crate::db::DEFAULT_LOCK_TIMEOUT;
use crate::error::StoreResult;
use crate::lock;
use crate::model::{Complaint, NewComplaint, User};
use crate::snapshot::Snapshot;
use crate::store::{ComplaintStore, StatusUpdate, UserCreation};

/// Complaint store held entirely in memory.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<Snapshot>>,
    lock_timeout: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bound on waiting for exclusive access.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    async fn state(&self) -> StoreResult<OwnedMutexGuard<Snapshot>> {
        lock::acquire(&self.state, self.lock_timeout).await
    }
}

#[async_trait]
impl ComplaintStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_user(&self, name: &str, mobile: &str) -> StoreResult<Option<User>> {
        Ok(self.state().await?.find_user(name, mobile))
    }

    #[instrument(skip(self))]
    async fn create_user(&self, name: &str, mobile: &str) -> StoreResult<UserCreation> {
        Ok(self.state().await?.create_user(name, mobile).outcome)
    }

    #[instrument(skip(self, complaint), fields(category = %complaint.category))]
    async fn create_complaint(&self, complaint: NewComplaint) -> StoreResult<Complaint> {
        Ok(self.state().await?.create_complaint(complaint).outcome)
    }

    async fn list_complaints(&self) -> StoreResult<Vec<Complaint>> {
        Ok(self.state().await?.complaints.clone())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: i64, status: &str) -> StoreResult<StatusUpdate> {
        Ok(self.state().await?.update_status(id, status).outcome)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
