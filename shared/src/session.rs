use anyhow::anyhow;

use crate::errors::ApiError;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "admin-auth";

/// Cookie lifetime: one day.
const MAX_AGE_SECONDS: u32 = 24 * 60 * 60;

/// Value of the named cookie, wherever it sits in the header. Pairs are
/// separated by `;` with optional whitespace around each pair.
fn cookie_value<'a>(request: &'a cgi::Request, name: &str) -> Option<&'a str> {
    let header = request
        .headers()
        .get(http::header::COOKIE)?
        .to_str()
        .ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Privileged actions are gated on the cookie's *presence* only; its value
/// is never validated against a session record or an expiry. Intentional,
/// do not harden here. An empty value counts as logged out, matching the
/// site this replaces.
pub fn has_session_cookie(request: &cgi::Request) -> bool {
    cookie_value(request, SESSION_COOKIE).is_some_and(|value| !value.is_empty())
}

pub fn require_session(request: &cgi::Request) -> anyhow::Result<()> {
    if has_session_cookie(request) {
        Ok(())
    } else {
        Err(anyhow!(ApiError::Unauthorized))
    }
}

/// `Set-Cookie` value issued on a successful login. The cookie value is
/// simply the admin username.
pub fn set_cookie_value(username: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, username, MAX_AGE_SECONDS
    )
}
