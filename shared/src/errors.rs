use thiserror::Error;

/// Errors a request handler surfaces to the HTTP layer. Anything else that
/// bubbles up through `anyhow` is reported as an internal server error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized - Please log in first.")]
    Unauthorized,
    #[error("Invalid request body")]
    InvalidBody,
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::InvalidBody => 400,
        }
    }
}
