//! End-to-end tests for the CivicDesk web front end.
//!
//! These tests spin up the **real** Axum server on an OS-assigned ephemeral
//! port and drive it with `reqwest`, following the citizen and admin flows
//! the way a browser would (cookies are carried by hand, redirects are
//! inspected rather than followed).

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use serde_json::Value;
use tokio::net::TcpListener;

use civicdesk_store::{ComplaintStore, JsonFileStore, MemoryStore};
use civicdesk_web::{WebConfig, WebServer};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Start a server over `store` on 127.0.0.1:0 and return its base URL.
async fn start_server(store: Arc<dyn ComplaintStore>) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind to port 0");
    let base = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    let server = WebServer::new(
        WebConfig {
            session_secret: "e2e-secret".into(),
            ..WebConfig::default()
        },
        store,
    );
    let handle = tokio::spawn(async move {
        server.serve(listener).await.ok();
    });

    (base, handle)
}

async fn seeded_server() -> String {
    let store = Arc::new(MemoryStore::new());
    store.seed_default_user().await.unwrap();
    let (base, _handle) = start_server(store).await;
    base
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

/// The `name=value` part of the session `Set-Cookie` header.
fn session_cookie(resp: &reqwest::Response) -> String {
    let header = resp
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_owned()
}

async fn login(client: &reqwest::Client, base: &str, name: &str, mobile: &str) -> String {
    let resp = client
        .post(format!("{base}/"))
        .form(&[("name", name), ("mobile", mobile)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/add_complaint");
    session_cookie(&resp)
}

// ── login / register ─────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_user_can_log_in() {
    let base = seeded_server().await;
    let cookie = login(&client(), &base, "Alice", "9876543210").await;
    assert!(cookie.starts_with("civicdesk_session="));
}

#[tokio::test]
async fn unknown_user_gets_register_link() {
    let base = seeded_server().await;
    let resp = client()
        .post(format!("{base}/"))
        .form(&[("name", "Alice"), ("mobile", "0000000000")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(SET_COOKIE).is_none());
    let body = resp.text().await.unwrap();
    assert!(body.contains("User not found!"));
    assert!(body.contains("/register"));
}

#[tokio::test]
async fn register_then_duplicate_mobile() {
    let base = seeded_server().await;
    let client = client();

    let resp = client
        .post(format!("{base}/register"))
        .form(&[("name", "  Bob "), ("mobile", " 1112223333 ")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/");

    // Fields were trimmed before storing.
    login(&client, &base, "Bob", "1112223333").await;

    let resp = client
        .post(format!("{base}/register"))
        .form(&[("name", "Robert"), ("mobile", "1112223333")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("User with this mobile already exists!")
    );
}

#[tokio::test]
async fn blank_credentials_are_rejected() {
    let base = seeded_server().await;
    let resp = client()
        .post(format!("{base}/register"))
        .form(&[("name", "   "), ("mobile", "1112223333")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── complaints ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn complaint_pages_require_login() {
    let base = seeded_server().await;
    let client = client();

    let resp = client.get(format!("{base}/add_complaint")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[LOCATION], "/");

    let resp = client
        .post(format!("{base}/add_complaint"))
        .header(COOKIE, "civicdesk_session=forged.token")
        .form(&[
            ("location", "Main St"),
            ("description", "Leak"),
            ("category", "water"),
            ("priority", "High"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let complaints: Value = client
        .get(format!("{base}/api/complaints"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(complaints, Value::Array(vec![]));
}

#[tokio::test]
async fn full_citizen_and_admin_flow() {
    let base = seeded_server().await;
    let client = client();

    client
        .post(format!("{base}/register"))
        .form(&[("name", "Bob"), ("mobile", "1112223333")])
        .send()
        .await
        .unwrap();
    let cookie = login(&client, &base, "Bob", "1112223333").await;

    // File a road complaint.
    let resp = client
        .post(format!("{base}/add_complaint"))
        .header(COOKIE, &cookie)
        .form(&[
            ("location", "Ring Road junction"),
            ("description", "Deep pothole in the left lane"),
            ("category", "Road"),
            ("priority", "High"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(
        "Complaint submitted! Department: Road Dept. Response: Avoid damaged road. Road Dept will repair in 3 days."
    ));

    // Admin resolves it.
    let resp = client
        .post(format!("{base}/admin"))
        .form(&[("id", "1"), ("status", "Resolved")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Complaint #1 marked Resolved."));
    assert!(body.contains("Ring Road junction"));

    let complaints: Value = client
        .get(format!("{base}/api/complaints"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let list = complaints.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], 1);
    assert_eq!(list[0]["name"], "Bob");
    assert_eq!(list[0]["mobile"], "1112223333");
    assert_eq!(list[0]["status"], "Resolved");
    assert_eq!(list[0]["department"], "Road Dept");
    assert_eq!(
        list[0]["response"],
        "Avoid damaged road. Road Dept will repair in 3 days."
    );
}

#[tokio::test]
async fn admin_unknown_or_bad_id_changes_nothing() {
    let base = seeded_server().await;
    let client = client();

    for (id, expected) in [("42", "Complaint #42 not found."), ("abc", "Complaint #abc not found.")] {
        let resp = client
            .post(format!("{base}/admin"))
            .form(&[("id", id), ("status", "Resolved")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.unwrap();
        assert!(body.contains(expected), "{id}");
        assert!(body.contains("No complaints filed yet."));
    }
}

// ── feedback / logout / static ───────────────────────────────────────────────

#[tokio::test]
async fn feedback_is_acknowledged_and_escaped() {
    let base = seeded_server().await;
    let client = client();
    let cookie = login(&client, &base, "Alice", "9876543210").await;

    let body = client
        .post(format!("{base}/feedback"))
        .header(COOKIE, &cookie)
        .form(&[("name", "<b>Alice</b>"), ("message", "Great service")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Thank you &lt;b&gt;Alice&lt;/b&gt;, your feedback has been submitted!"));
}

#[tokio::test]
async fn logout_clears_cookie() {
    let base = seeded_server().await;
    let resp = client().get(format!("{base}/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let header = resp.headers()[SET_COOKIE].to_str().unwrap();
    assert!(header.contains("Max-Age=0"));
}

#[tokio::test]
async fn static_pages_render() {
    let base = seeded_server().await;
    for path in ["/", "/register", "/about", "/contact", "/admin"] {
        let resp = client().get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        assert!(resp.text().await.unwrap().contains("CivicDesk"), "{path}");
    }
}

// ── storage failures ─────────────────────────────────────────────────────────

#[tokio::test]
async fn broken_storage_is_503_not_not_found() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the JSON state file should be.
    let (base, _handle) = start_server(Arc::new(JsonFileStore::new(dir.path()))).await;
    let client = client();

    let resp = client
        .post(format!("{base}/admin"))
        .form(&[("id", "1"), ("status", "Resolved")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = client
        .post(format!("{base}/"))
        .form(&[("name", "Alice"), ("mobile", "9876543210")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = client.get(format!("{base}/api/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let health: Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "unavailable");
    assert_eq!(health["backend"], "json");
}

#[tokio::test]
async fn health_reports_backend() {
    let base = seeded_server().await;
    let health: Value = client()
        .get(format!("{base}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["backend"], "memory");
}
