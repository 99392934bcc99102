use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::management::SessionId;

/// Carries the opaque session id.
pub const SESSION_COOKIE: &str = "session";

/// Carries the login attempt id between `/authenticate` and `/callback`.
pub const ATTEMPT_COOKIE: &str = "sID";

pub fn session_cookie(id: &SessionId, ttl: std::time::Duration, secure: bool) -> Cookie<'static> {
    build(SESSION_COOKIE, id.as_str().to_string(), ttl, secure)
}

pub fn attempt_cookie(attempt_id: &str, ttl: std::time::Duration, secure: bool) -> Cookie<'static> {
    build(ATTEMPT_COOKIE, attempt_id.to_string(), ttl, secure)
}

pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    removal(SESSION_COOKIE, secure)
}

pub fn clear_attempt_cookie(secure: bool) -> Cookie<'static> {
    removal(ATTEMPT_COOKIE, secure)
}

fn build(name: &'static str, value: String, ttl: std::time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)))
        .build()
}

/// Same attributes as the cookie it replaces, expiring immediately.
fn removal(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
