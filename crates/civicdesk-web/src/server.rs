//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and runs
//! the HTTP listener until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use civicdesk_store::ComplaintStore;

use crate::WebConfig;
use crate::api;
use crate::pages;
use crate::state::AppState;

/// The CivicDesk web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server over `store`.
    pub fn new(config: WebConfig, store: Arc<dyn ComplaintStore>) -> Self {
        if config.session_secret == crate::DEV_SESSION_SECRET {
            tracing::warn!("using the development session secret; set SECRET_KEY in production");
        }
        let state = Arc::new(AppState::new(config.clone(), store));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        Router::new()
            // Citizen pages.
            .route("/", get(pages::login_form).post(pages::login))
            .route("/register", get(pages::register_form).post(pages::register))
            .route(
                "/add_complaint",
                get(pages::complaint_form).post(pages::submit_complaint),
            )
            .route(
                "/feedback",
                get(pages::feedback_form).post(pages::submit_feedback),
            )
            .route("/about", get(pages::about))
            .route("/contact", get(pages::contact))
            .route("/logout", get(pages::logout))
            // Administrator.
            .route("/admin", get(pages::dashboard).post(pages::update_status))
            // JSON API.
            .route("/api/complaints", get(api::complaints))
            .route("/api/health", get(api::health))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let router = self.router();
        tracing::info!(addr = %listener.local_addr()?, "starting web server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
