use shared::{session, settings};

/// Edge gate for the admin path, meant to sit behind the web server's
/// auth-subrequest hook (nginx `auth_request` or equivalent): 200 admits
/// the request, anything else sends the visitor to the login page. Only
/// the cookie's presence is checked; no authorization happens here.
fn gate(request: &cgi::Request, login_url: &str) -> anyhow::Result<cgi::Response> {
    if session::has_session_cookie(request) {
        let response = http::response::Builder::new()
            .status(200)
            .header(http::header::CONTENT_TYPE, "text/plain")
            .body("OK".as_bytes().to_vec())?;
        Ok(response)
    } else {
        let body: Vec<u8> = "Redirecting".as_bytes().to_vec();
        let response = http::response::Builder::new()
            .status(302)
            .header(http::header::LOCATION, login_url)
            .header(http::header::CONTENT_TYPE, "text/plain")
            .body(body)?;
        Ok(response)
    }
}

cgi::cgi_try_main! { |request: cgi::Request| -> anyhow::Result<cgi::Response> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    gate(&request, &settings::login_url())
}}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cookie: Option<&str>) -> cgi::Request {
        let mut builder = http::request::Builder::new().method("GET").uri("/admin");
        if let Some(value) = cookie {
            builder = builder.header(http::header::COOKIE, value);
        }
        builder.body(Vec::new()).unwrap()
    }

    #[test]
    fn cookie_holders_are_admitted() {
        let response = gate(&request(Some("admin-auth=admin")), "/auth/login").unwrap();
        assert_eq!(response.status(), 200);

        // Other cookies ahead of ours must not hide it.
        let response = gate(&request(Some("theme=dark; admin-auth=admin")), "/auth/login").unwrap();
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn everyone_else_is_sent_to_the_login_page() {
        let response = gate(&request(None), "/auth/login").unwrap();
        assert_eq!(response.status(), 302);
        assert_eq!(response.headers()[http::header::LOCATION], "/auth/login");
    }
}
