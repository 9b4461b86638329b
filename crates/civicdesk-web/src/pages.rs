//! Server-rendered page handlers.
//!
//! Each POST handler trims its form fields, makes one store call, and
//! renders the outcome. Pages behind login redirect to `/` when the
//! session cookie is missing or invalid.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use civicdesk_store::{NewComplaint, StatusUpdate, UserCreation};

use crate::error::WebError;
use crate::session;
use crate::state::AppState;
use crate::templates;

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct ComplaintForm {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Trimmed name and mobile, both required.
fn credentials(form: &CredentialsForm) -> Result<(&str, &str), WebError> {
    let name = form.name.trim();
    let mobile = form.mobile.trim();
    if name.is_empty() || mobile.is_empty() {
        return Err(WebError::BadRequest("Name and mobile are required.".into()));
    }
    Ok((name, mobile))
}

// ---------------------------------------------------------------------------
// / (login)
// ---------------------------------------------------------------------------

pub async fn login_form() -> Html<String> {
    Html(templates::login_page())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    let (name, mobile) = credentials(&form)?;

    match state.store.find_user(name, mobile).await? {
        Some(user) => {
            let cookie = state.sessions.login_cookie(&user)?;
            info!(mobile = %user.mobile, "citizen logged in");
            Ok((jar.add(cookie), Redirect::to("/add_complaint")).into_response())
        }
        None => {
            warn!(%mobile, "login with unknown name/mobile");
            Ok((
                StatusCode::UNAUTHORIZED,
                Html(templates::message_page(
                    "Login failed",
                    "User not found! <a href=\"/register\">Register here</a>",
                )),
            )
                .into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// /register
// ---------------------------------------------------------------------------

pub async fn register_form() -> Html<String> {
    Html(templates::register_page())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    let (name, mobile) = credentials(&form)?;

    match state.store.create_user(name, mobile).await? {
        UserCreation::Created(user) => {
            info!(mobile = %user.mobile, "citizen registered");
            Ok(Redirect::to("/").into_response())
        }
        UserCreation::AlreadyExists => {
            warn!(%mobile, "registration with a mobile already on file");
            Ok((
                StatusCode::CONFLICT,
                Html(templates::message_page(
                    "Registration failed",
                    "User with this mobile already exists! <a href=\"/register\">Try again</a>",
                )),
            )
                .into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// /add_complaint
// ---------------------------------------------------------------------------

pub async fn complaint_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match state.sessions.current_user(&jar) {
        Some(user) => Html(templates::add_complaint_page(&user, None)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

pub async fn submit_complaint(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ComplaintForm>,
) -> Result<Response, WebError> {
    let Some(user) = state.sessions.current_user(&jar) else {
        return Ok(Redirect::to("/").into_response());
    };

    let location = form.location.trim();
    let description = form.description.trim();
    if location.is_empty() || description.is_empty() {
        return Err(WebError::BadRequest(
            "Location and description are required.".into(),
        ));
    }

    let filed = state
        .store
        .create_complaint(NewComplaint {
            name: user.name.clone(),
            mobile: user.mobile.clone(),
            location: location.to_owned(),
            description: description.to_owned(),
            category: form.category.trim().to_owned(),
            priority: form.priority.trim().to_owned(),
        })
        .await?;
    info!(id = filed.id, department = %filed.department, "complaint filed");

    let message = format!(
        "Complaint submitted! Department: {}. Response: {}",
        filed.department, filed.response
    );
    Ok(Html(templates::add_complaint_page(&user, Some(&message))).into_response())
}

// ---------------------------------------------------------------------------
// /admin
// ---------------------------------------------------------------------------

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, WebError> {
    let complaints = state.store.list_complaints().await?;
    Ok(Html(templates::dashboard_page(&complaints, None, false)))
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Form(form): Form<StatusForm>,
) -> Result<Html<String>, WebError> {
    let raw_id = form.id.trim();
    let status = form.status.trim();

    let (notice, is_error) = if status.is_empty() {
        ("Status must not be empty.".to_owned(), true)
    } else {
        match raw_id.parse::<i64>() {
            Ok(id) => match state.store.update_status(id, status).await? {
                StatusUpdate::Updated => {
                    info!(id, %status, "complaint status updated");
                    (format!("Complaint #{id} marked {status}."), false)
                }
                StatusUpdate::NotFound => {
                    warn!(id, "status update for unknown complaint");
                    (format!("Complaint #{id} not found."), true)
                }
            },
            Err(_) => {
                warn!(id = %raw_id, "status update with non-numeric id");
                (format!("Complaint #{raw_id} not found."), true)
            }
        }
    };

    let complaints = state.store.list_complaints().await?;
    Ok(Html(templates::dashboard_page(
        &complaints,
        Some(&notice),
        is_error,
    )))
}

// ---------------------------------------------------------------------------
// /feedback
// ---------------------------------------------------------------------------

pub async fn feedback_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match state.sessions.current_user(&jar) {
        Some(user) => Html(templates::feedback_page(&user)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// Acknowledge feedback. It is not stored.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FeedbackForm>,
) -> Response {
    let Some(user) = state.sessions.current_user(&jar) else {
        return Redirect::to("/").into_response();
    };
    let name = match form.name.trim() {
        "" => user.name.as_str(),
        name => name,
    };
    info!(mobile = %user.mobile, length = form.message.len(), "feedback received");

    Html(templates::message_page(
        "Thank you",
        &format!(
            "Thank you {}, your feedback has been submitted!",
            templates::escape(name)
        ),
    ))
    .into_response()
}

// ---------------------------------------------------------------------------
// Static pages and logout
// ---------------------------------------------------------------------------

pub async fn about() -> Html<String> {
    Html(templates::about_page())
}

pub async fn contact() -> Html<String> {
    Html(templates::contact_page())
}

pub async fn logout(jar: CookieJar) -> Response {
    (session::logout(jar), Redirect::to("/")).into_response()
}
