//! Records held by the store.
//!
//! Field names double as the on-disk layout of the JSON backend and the
//! column names of the SQLite backend.

use serde::{Deserialize, Serialize};

use crate::routing::route;

/// Status every complaint starts in.
pub const INITIAL_STATUS: &str = "Pending";

// ═══════════════════════════════════════════════════════════════════════
//  User
// ═══════════════════════════════════════════════════════════════════════

/// A registered citizen. `mobile` is the unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name; not unique on its own.
    pub name: String,
    /// Phone number; at most one user per value.
    pub mobile: String,
}

impl User {
    pub fn new(name: impl Into<String>, mobile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mobile: mobile.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Complaint
// ═══════════════════════════════════════════════════════════════════════

/// The submitter-supplied part of a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    pub name: String,
    pub mobile: String,
    pub location: String,
    pub description: String,
    pub category: String,
    pub priority: String,
}

/// A filed complaint.
///
/// `name` and `mobile` are a snapshot of the submitter at filing time.
/// `department` and `response` are derived once from `category` and never
/// change; `status` is the only field mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    /// Position in creation order, starting at 1.
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub location: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub department: String,
    pub status: String,
    pub response: String,
}

impl NewComplaint {
    /// Route the complaint and freeze it into a record with the given id.
    pub(crate) fn into_complaint(self, id: i64) -> Complaint {
        let routing = route(&self.category);
        Complaint {
            id,
            name: self.name,
            mobile: self.mobile,
            location: self.location,
            description: self.description,
            category: self.category,
            priority: self.priority,
            department: routing.department.to_owned(),
            status: INITIAL_STATUS.to_owned(),
            response: routing.response.to_owned(),
        }
    }
}
