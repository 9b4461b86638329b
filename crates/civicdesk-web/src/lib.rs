//! Web interface for CivicDesk.
//!
//! This crate provides the HTTP server citizens and the administrator use:
//!
//! - Server-rendered pages for login, registration, complaint filing,
//!   feedback, and the admin status dashboard.
//! - A signed, stateless session cookie identifying the logged-in citizen.
//! - A small JSON API for complaint export and health checks.
//!
//! All persistence goes through the [`ComplaintStore`](civicdesk_store::ComplaintStore)
//! injected into [`WebServer::new`].

pub mod api;
pub mod error;
pub mod pages;
pub mod server;
pub mod session;
pub mod state;
pub mod templates;

pub use error::WebError;
pub use server::WebServer;
pub use session::{SessionKeys, SessionUser};
pub use state::AppState;

/// Secret used when none is configured. Only fit for local development.
pub const DEV_SESSION_SECRET: &str = "civicdesk-dev-secret";

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Key for signing session cookies.
    pub session_secret: String,
    /// Session lifetime in seconds.
    pub session_ttl_secs: i64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5000,
            session_secret: DEV_SESSION_SECRET.into(),
            session_ttl_secs: 3600,
        }
    }
}
