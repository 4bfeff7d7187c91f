use base64::{prelude::BASE64_STANDARD, Engine};
use serde::Deserialize;
use serde_json::json;
use shared::{
    session, settings,
    utils::{json_body, json_response},
};
use tracing::{error, warn};

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

fn message_response(status: u16, message: &str) -> anyhow::Result<cgi::Response> {
    json_response(status, &json!({ "message": message }))
}

/// The stored hash is base64-wrapped so a `$2b$...` bcrypt string survives
/// environment files unquoted.
fn decode_password_hash(encoded: &str) -> anyhow::Result<String> {
    let bytes = BASE64_STANDARD.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}

fn do_login(
    request: &cgi::Request,
    admin_username: Option<String>,
    admin_password_hash: Option<String>,
) -> anyhow::Result<cgi::Response> {
    if request.method() != "POST" {
        return message_response(405, "Method not allowed");
    }

    let form: LoginForm = match json_body(request) {
        Ok(form) => form,
        Err(_) => return message_response(400, "Username and password are required"),
    };
    let (username, password) = match (form.username, form.password) {
        (Some(username), Some(password)) => (username, password),
        _ => return message_response(400, "Username and password are required"),
    };

    let (admin_username, encoded_hash) = match (admin_username, admin_password_hash) {
        (Some(u), Some(h)) => (u, h),
        _ => {
            error!("ADMIN_USERNAME / ADMIN_PASSWORD_HASH are not configured");
            return message_response(500, "Server configuration error");
        }
    };

    if username != admin_username {
        warn!("login rejected for unknown username");
        return message_response(401, "Invalid username or password");
    }

    let stored_hash = decode_password_hash(&encoded_hash)?;
    let valid = bcrypt::verify(password.as_bytes(), &stored_hash).unwrap_or(false);
    if !valid {
        warn!("login rejected: password mismatch");
        return message_response(401, "Invalid username or password");
    }

    let body = serde_json::to_vec(&json!({
        "message": "Login successful",
        "user": { "username": admin_username, "role": "admin" },
    }))?;
    let response = http::response::Builder::new()
        .status(200)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(
            http::header::SET_COOKIE,
            session::set_cookie_value(&admin_username),
        )
        .body(body)?;
    Ok(response)
}

cgi::cgi_try_main! { |request: cgi::Request| -> anyhow::Result<cgi::Response> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    do_login(&request, settings::admin_username(), settings::admin_password_hash())
}}
