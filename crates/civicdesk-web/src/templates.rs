//! Server-rendered HTML pages.
//!
//! Every page shares one layout with inline CSS; no external assets are
//! needed. Anything that came from a user passes through [`escape`].

use civicdesk_store::Complaint;

use crate::session::SessionUser;

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
*,*::before,*::after{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;background:#f4f6f8;color:#1f2933}
header{background:#1f4e79;color:#fff;padding:12px 24px;display:flex;align-items:center;justify-content:space-between}
header a{color:#fff;margin-left:16px;text-decoration:none;font-size:14px}
header h1{font-size:18px;margin:0}
main{max-width:960px;margin:32px auto;padding:0 16px}
.card{background:#fff;border-radius:8px;padding:24px;box-shadow:0 1px 3px rgba(0,0,0,.1)}
label{display:block;margin:12px 0 4px;font-weight:600;font-size:14px}
input,select,textarea{width:100%;padding:8px;border:1px solid #cbd2d9;border-radius:4px;font-size:14px}
button{margin-top:16px;padding:10px 20px;border:0;border-radius:4px;background:#1f4e79;color:#fff;font-size:14px;cursor:pointer}
.notice{padding:12px;border-radius:4px;margin-bottom:16px;background:#e3f2e8;border:1px solid #8fd19e}
.notice.error{background:#fdecea;border-color:#f5a3a3}
table{width:100%;border-collapse:collapse;font-size:13px}
th,td{border-bottom:1px solid #e4e7eb;padding:8px;text-align:left;vertical-align:top}
th{background:#f0f4f8}
.inline{display:flex;gap:8px;align-items:flex-end}
.inline label{margin-top:0}
"#;

/// Wrap `body` (already-safe HTML) in the site layout.
fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<span>{}</span><a href="/add_complaint">File complaint</a><a href="/feedback">Feedback</a><a href="/logout">Logout</a>"#,
            escape(&user.name)
        ),
        None => r#"<a href="/">Login</a><a href="/register">Register</a>"#.to_owned(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · CivicDesk</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1>CivicDesk</h1><nav>{nav}<a href="/about">About</a><a href="/contact">Contact</a></nav></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn notice(text: Option<&str>, is_error: bool) -> String {
    match text {
        Some(text) => format!(
            r#"<div class="notice{}">{}</div>"#,
            if is_error { " error" } else { "" },
            escape(text)
        ),
        None => String::new(),
    }
}

// ── citizen pages ───────────────────────────────────────────────────

pub fn login_page() -> String {
    layout(
        "Login",
        None,
        r#"<div class="card">
<h2>Citizen login</h2>
<form method="post" action="/">
<label for="name">Name</label><input id="name" name="name" required>
<label for="mobile">Mobile</label><input id="mobile" name="mobile" required>
<button type="submit">Login</button>
</form>
<p>New here? <a href="/register">Register</a></p>
</div>"#,
    )
}

pub fn register_page() -> String {
    layout(
        "Register",
        None,
        r#"<div class="card">
<h2>Register</h2>
<form method="post" action="/register">
<label for="name">Name</label><input id="name" name="name" required>
<label for="mobile">Mobile</label><input id="mobile" name="mobile" required>
<button type="submit">Register</button>
</form>
</div>"#,
    )
}

/// A short page carrying one message. `message_html` must already be safe.
pub fn message_page(title: &str, message_html: &str) -> String {
    layout(
        title,
        None,
        &format!(r#"<div class="card"><p>{message_html}</p></div>"#),
    )
}

pub fn add_complaint_page(user: &SessionUser, submitted: Option<&str>) -> String {
    let body = format!(
        r#"<div class="card">
{notice}
<h2>File a complaint</h2>
<form method="post" action="/add_complaint">
<label for="location">Location</label><input id="location" name="location" required>
<label for="description">Description</label><textarea id="description" name="description" rows="4" required></textarea>
<label for="category">Category</label>
<select id="category" name="category">
<option>Water</option><option>Road</option><option>Electricity</option><option>Other</option>
</select>
<label for="priority">Priority</label>
<select id="priority" name="priority">
<option>Low</option><option selected>Medium</option><option>High</option>
</select>
<button type="submit">Submit</button>
</form>
</div>"#,
        notice = notice(submitted, false),
    );
    layout("File a complaint", Some(user), &body)
}

pub fn feedback_page(user: &SessionUser) -> String {
    let body = format!(
        r#"<div class="card">
<h2>Feedback</h2>
<form method="post" action="/feedback">
<label for="name">Name</label><input id="name" name="name" value="{name}" required>
<label for="message">Message</label><textarea id="message" name="message" rows="4" required></textarea>
<button type="submit">Send</button>
</form>
</div>"#,
        name = escape(&user.name),
    );
    layout("Feedback", Some(user), &body)
}

pub fn about_page() -> String {
    layout(
        "About",
        None,
        r#"<div class="card"><h2>About CivicDesk</h2>
<p>CivicDesk lets residents report civic problems. Each complaint is routed
to the Water, Road, Electricity or Municipal department with an initial
response, and the administrator tracks its status until it is resolved.</p></div>"#,
    )
}

pub fn contact_page() -> String {
    layout(
        "Contact",
        None,
        r#"<div class="card"><h2>Contact</h2>
<p>Municipal help desk: visit the ward office during working hours, or file
a complaint online and follow its status on the dashboard.</p></div>"#,
    )
}

pub fn unavailable_page() -> String {
    message_page(
        "Service unavailable",
        "The complaint records are temporarily unavailable. Please try again shortly.",
    )
}

// ── admin ───────────────────────────────────────────────────────────

/// The admin dashboard: status update form and the complaint table.
pub fn dashboard_page(complaints: &[Complaint], notice_text: Option<&str>, is_error: bool) -> String {
    let rows: String = complaints
        .iter()
        .map(|c| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td><strong>{}</strong></td><td>{}</td></tr>\n",
                c.id,
                escape(&c.name),
                escape(&c.mobile),
                escape(&c.location),
                escape(&c.description),
                escape(&c.category),
                escape(&c.priority),
                escape(&c.department),
                escape(&c.status),
                escape(&c.response),
            )
        })
        .collect();

    let table = if complaints.is_empty() {
        "<p>No complaints filed yet.</p>".to_owned()
    } else {
        format!(
            "<table>\n<tr><th>ID</th><th>Name</th><th>Mobile</th><th>Location</th>\
             <th>Description</th><th>Category</th><th>Priority</th><th>Department</th>\
             <th>Status</th><th>Response</th></tr>\n{rows}</table>"
        )
    };

    let body = format!(
        r#"<div class="card">
{notice}
<h2>Admin dashboard</h2>
<form method="post" action="/admin" class="inline">
<div><label for="id">Complaint ID</label><input id="id" name="id" required></div>
<div><label for="status">New status</label><input id="status" name="status" list="statuses" required>
<datalist id="statuses"><option value="Pending"><option value="In Progress"><option value="Resolved"></datalist></div>
<button type="submit">Update</button>
</form>
<h3>Complaints ({count})</h3>
{table}
</div>"#,
        notice = notice(notice_text, is_error),
        count = complaints.len(),
    );
    layout("Admin", None, &body)
}
