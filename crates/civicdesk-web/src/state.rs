//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers. The store is injected by the caller; handlers never reach for
//! a global.

use std::sync::Arc;

use civicdesk_store::ComplaintStore;

use crate::WebConfig;
use crate::session::SessionKeys;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Users and complaints.
    pub store: Arc<dyn ComplaintStore>,

    /// Session cookie signing and verification.
    pub sessions: SessionKeys,

    /// Web server configuration.
    pub config: WebConfig,
}

impl AppState {
    pub fn new(config: WebConfig, store: Arc<dyn ComplaintStore>) -> Self {
        let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_secs);
        Self {
            store,
            sessions,
            config,
        }
    }
}
