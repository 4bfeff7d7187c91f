use std::env;

const DEFAULT_DB_PATH: &str = "db/blog.json";
const DEFAULT_LOGIN_URL: &str = "/auth/login";

/// Path of the backing JSON database file.
pub fn db_path() -> String {
    env::var("BLOG_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string())
}

/// Where the admin edge gate sends unauthenticated visitors.
pub fn login_url() -> String {
    env::var("BLOG_LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string())
}

pub fn admin_username() -> Option<String> {
    env::var("ADMIN_USERNAME").ok()
}

/// Base64-encoded bcrypt hash of the admin password. Encoding sidesteps
/// `$2b$...` quoting problems in environment files.
pub fn admin_password_hash() -> Option<String> {
    env::var("ADMIN_PASSWORD_HASH").ok()
}
