//! services/api/src/web/cookies.rs
//!
//! Builds and reads the cookies this service works with. The reading cookie
//! records the last-served chapter ordinal so a client can resume where it
//! left off.

use axum::http::{header, HeaderMap};

/// Name of the cookie that carries the last-served chapter ordinal.
pub const READING_COOKIE: &str = "chapter";

/// Formats a `Set-Cookie` header value scoped to the whole site.
///
/// No `Max-Age` or `Expires`: the cookie lives for the browser session,
/// which is all a resume-reading marker needs.
pub fn build_cookie(name: &str, value: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", name, value)
}

/// Extracts one cookie's value from the request `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let pair = pair.trim();
        pair.strip_prefix(name)?.strip_prefix('=')
    })
}

/// Renders every request cookie as `name=value, name=value`.
///
/// Returns `None` when the request carries no cookies at all.
pub fn format_all(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let rendered: Vec<&str> = cookie_header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if rendered.is_empty() {
        return None;
    }
    Some(rendered.join(", "))
}
