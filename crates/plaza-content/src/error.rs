use thiserror::Error;

/// Content resolution errors
#[derive(Debug, Error)]
pub enum ContentError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Gateway answered with a non-success status
    #[error("Gateway error: {0}")]
    GatewayError(String),
}

/// Content result type
pub type ContentResult<T> = Result<T, ContentError>;

impl From<reqwest::Error> for ContentError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ContentError::ConnectionError(format!("Connection timeout: {}", error))
        } else if error.is_connect() {
            ContentError::ConnectionError(format!("Connection error: {}", error))
        } else {
            ContentError::ConnectionError(format!("HTTP error: {}", error))
        }
    }
}
