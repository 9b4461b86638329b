//! # civicdesk-store
//!
//! Storage layer for CivicDesk.
//!
//! Owns the two persistent collections of the complaint desk (registered
//! users and filed complaints) behind the [`ComplaintStore`] trait, and the
//! pure [`route`] rule that assigns every complaint to a department.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  ComplaintStore (async trait, Arc<dyn ..>)   │
//! ├───────────────┬───────────────┬──────────────┤
//! │  SqliteStore  │ JsonFileStore │ MemoryStore  │
//! │  (rusqlite)   │ (load-mutate- │ (tests, dev) │
//! │               │  save, atomic)│              │
//! ├───────────────┴───────┬───────┴──────────────┤
//! │  Database + schema    │  Snapshot (shared    │
//! │  (WAL, busy_timeout)  │  mutation logic)     │
//! └───────────────────────┴──────────────────────┘
//! ```
//!
//! The backend is picked at runtime from a [`StoreConfig`]:
//!
//! ```ignore
//! use civicdesk_store::{StoreConfig, open_store};
//!
//! let store = open_store(&StoreConfig::default()).await?;
//! store.seed_default_user().await?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod json_file;
mod lock;
pub mod memory;
pub mod model;
pub mod routing;
pub mod schema;
mod snapshot;
pub mod sqlite;
pub mod store;

// ── re-exports ───────────────────────────────────────────────────────

pub use config::{StoreBackend, StoreConfig, open_store};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use model::{Complaint, INITIAL_STATUS, NewComplaint, User};
pub use routing::{Routing, route};
pub use sqlite::SqliteStore;
pub use store::{ComplaintStore, SEED_USER_MOBILE, SEED_USER_NAME, StatusUpdate, UserCreation};
