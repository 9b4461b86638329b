//! Stateless login sessions.
//!
//! The session lives entirely in one cookie:
//! `base64url(json claims) "." base64url(HMAC-SHA256(claims))`.
//! Nothing is stored server-side. A cookie that is malformed, carries a
//! bad signature, or has expired reads as "not logged in".

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::Utc;
use ring::hmac;
use serde::{Deserialize, Serialize};
use tracing::debug;

use civicdesk_store::User;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "civicdesk_session";

/// The citizen a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub name: String,
    pub mobile: String,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    name: String,
    mobile: String,
    /// Unix timestamp after which the session is void.
    exp: i64,
}

/// Signs and verifies session cookies.
#[derive(Clone)]
pub struct SessionKeys {
    key: hmac::Key,
    ttl_secs: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Signed token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> serde_json::Result<String> {
        self.issue_at(user, Utc::now().timestamp())
    }

    fn issue_at(&self, user: &User, now: i64) -> serde_json::Result<String> {
        let claims = Claims {
            name: user.name.clone(),
            mobile: user.mobile.clone(),
            exp: now.saturating_add(self.ttl_secs),
        };
        let payload = B64.encode(serde_json::to_vec(&claims)?);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        Ok(format!("{payload}.{}", B64.encode(tag.as_ref())))
    }

    /// The user a token was issued to, if it is authentic and unexpired.
    pub fn verify(&self, token: &str) -> Option<SessionUser> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Option<SessionUser> {
        let (payload, tag) = token.split_once('.')?;
        let tag = B64.decode(tag).ok()?;
        if hmac::verify(&self.key, payload.as_bytes(), &tag).is_err() {
            debug!("rejecting session cookie with bad signature");
            return None;
        }

        let claims: Claims = serde_json::from_slice(&B64.decode(payload).ok()?).ok()?;
        if claims.exp <= now {
            debug!(mobile = %claims.mobile, "session expired");
            return None;
        }
        Some(SessionUser {
            name: claims.name,
            mobile: claims.mobile,
        })
    }

    /// The logged-in user named by the request's session cookie.
    pub fn current_user(&self, jar: &CookieJar) -> Option<SessionUser> {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| self.verify(cookie.value()))
    }

    /// Session cookie that logs `user` in.
    pub fn login_cookie(&self, user: &User) -> serde_json::Result<Cookie<'static>> {
        let token = self.issue(user)?;
        Ok(Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl_secs))
            .build())
    }
}

/// Replace the session cookie with an already expired one.
pub fn logout(jar: CookieJar) -> CookieJar {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    jar.add(cookie)
}
