//! Whole-state representation shared by the JSON and memory backends.
//!
//! All contract logic for those backends lives here, as plain mutations
//! on an owned value. The mutating methods report whether anything
//! changed so callers only write back when needed.

use serde::{Deserialize, Serialize};

use crate::model::{Complaint, NewComplaint, User};
use crate::store::{StatusUpdate, UserCreation};

/// The complete persisted state: `{"users": [...], "complaints": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub complaints: Vec<Complaint>,
}

/// A mutation result plus whether the state must be written back.
pub(crate) struct Mutation<T> {
    pub outcome: T,
    pub dirty: bool,
}

impl<T> Mutation<T> {
    fn changed(outcome: T) -> Self {
        Self {
            outcome,
            dirty: true,
        }
    }

    fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            dirty: false,
        }
    }
}

impl Snapshot {
    pub fn find_user(&self, name: &str, mobile: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.name == name && u.mobile == mobile)
            .cloned()
    }

    pub fn create_user(&mut self, name: &str, mobile: &str) -> Mutation<UserCreation> {
        if self.users.iter().any(|u| u.mobile == mobile) {
            return Mutation::unchanged(UserCreation::AlreadyExists);
        }
        let user = User::new(name, mobile);
        self.users.push(user.clone());
        Mutation::changed(UserCreation::Created(user))
    }

    /// Ids are positions: complaints are never deleted, so `len + 1` is
    /// unique and gap-free.
    pub fn create_complaint(&mut self, complaint: NewComplaint) -> Mutation<Complaint> {
        let id = i64::try_from(self.complaints.len()).unwrap_or(i64::MAX - 1) + 1;
        let record = complaint.into_complaint(id);
        self.complaints.push(record.clone());
        Mutation::changed(record)
    }

    pub fn update_status(&mut self, id: i64, status: &str) -> Mutation<StatusUpdate> {
        match self.complaints.iter_mut().find(|c| c.id == id) {
            Some(complaint) => {
                complaint.status = status.to_owned();
                Mutation::changed(StatusUpdate::Updated)
            }
            None => Mutation::unchanged(StatusUpdate::NotFound),
        }
    }
}
