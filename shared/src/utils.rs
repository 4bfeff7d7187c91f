use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub fn json_body<T: for<'a> Deserialize<'a>>(request: &cgi::Request) -> anyhow::Result<T> {
    serde_json::from_slice(request.body()).map_err(|e| anyhow!(e))
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> anyhow::Result<cgi::Response> {
    let content = serde_json::to_vec(body)?;
    let response = http::response::Builder::new()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(content)?;
    Ok(response)
}

pub fn success_response() -> anyhow::Result<cgi::Response> {
    json_response(200, &serde_json::json!({ "success": true }))
}

pub fn error_response(status: u16, message: &str) -> anyhow::Result<cgi::Response> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// Millisecond timestamp used as the id for new posts and comments.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Calendar-date key for the daily view records.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Creation date for posts and comments. Same clock as `today`, so the
/// today's-comments aggregation can match on the date prefix.
pub fn now_datetime() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// RFC 7231 format for the `Last-Modified` header.
pub fn http_date(when: DateTime<Utc>) -> String {
    when.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
