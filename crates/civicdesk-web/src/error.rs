//! Request-layer errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use civicdesk_store::StoreError;

use crate::templates;

/// Anything a page handler can fail with.
#[derive(Debug, Error)]
pub enum WebError {
    /// The storage medium failed; shown as 503, never as "not found".
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The submitted form is missing required input.
    #[error("{0}")]
    BadRequest(String),

    /// The session cookie could not be encoded.
    #[error("session encoding failed: {0}")]
    Session(#[from] serde_json::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::Store(err) => {
                error!(error = %err, "storage failure while handling request");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Html(templates::unavailable_page()),
                )
                    .into_response()
            }
            Self::BadRequest(message) => {
                warn!(%message, "rejected form submission");
                (
                    StatusCode::BAD_REQUEST,
                    Html(templates::message_page(
                        "Invalid input",
                        &templates::escape(&message),
                    )),
                )
                    .into_response()
            }
            Self::Session(err) => {
                error!(error = %err, "failed to issue session cookie");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::message_page(
                        "Login failed",
                        "Could not start a session. Please try again.",
                    )),
                )
                    .into_response()
            }
        }
    }
}
