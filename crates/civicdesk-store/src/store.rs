//! The [`ComplaintStore`] contract shared by every backend.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::model::{Complaint, NewComplaint, User};

/// Name of the user created by [`ComplaintStore::seed_default_user`].
pub const SEED_USER_NAME: &str = "Alice";

/// Mobile number of the seeded user.
pub const SEED_USER_MOBILE: &str = "9876543210";

/// Outcome of [`ComplaintStore::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCreation {
    /// The user was appended and persisted.
    Created(User),
    /// A user with the same mobile is already on file; nothing changed.
    AlreadyExists,
}

/// Outcome of [`ComplaintStore::update_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The status was overwritten and persisted.
    Updated,
    /// No complaint has that id; nothing changed.
    NotFound,
}

/// Persistent keep of users and complaints.
///
/// Every method either completes its contract or returns a
/// [`StoreError`](crate::StoreError) describing a storage failure.
/// Returned records are owned copies; mutating them never touches stored
/// state.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Short label for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Return the user whose name and mobile both match exactly.
    async fn find_user(&self, name: &str, mobile: &str) -> StoreResult<Option<User>>;

    /// Register a user unless the mobile is already taken.
    async fn create_user(&self, name: &str, mobile: &str) -> StoreResult<UserCreation>;

    /// File a complaint: route it, assign the next id, persist it, and
    /// return the frozen record.
    async fn create_complaint(&self, complaint: NewComplaint) -> StoreResult<Complaint>;

    /// All complaints in creation order.
    async fn list_complaints(&self) -> StoreResult<Vec<Complaint>>;

    /// Overwrite the status of complaint `id`.
    async fn update_status(&self, id: i64, status: &str) -> StoreResult<StatusUpdate>;

    /// Cheap read proving the medium is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Create the default user if no user holds its mobile yet.
    ///
    /// Returns `true` when the user was created by this call.
    async fn seed_default_user(&self) -> StoreResult<bool> {
        match self.create_user(SEED_USER_NAME, SEED_USER_MOBILE).await? {
            UserCreation::Created(_) => {
                info!(backend = self.backend_name(), "seeded default user");
                Ok(true)
            }
            UserCreation::AlreadyExists => {
                debug!(backend = self.backend_name(), "default user already present");
                Ok(false)
            }
        }
    }
}
