use thiserror::Error;

/// Errors raised by chain adapters
#[derive(Error, Debug)]
pub enum ChainError {
    /// The chain endpoint could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The endpoint answered, but not usably
    #[error("Middleware error: {0}")]
    MiddlewareError(String),
}

pub type ChainResult<T> = Result<T, ChainError>;

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ChainError::ConnectionError(err.to_string())
        } else {
            ChainError::MiddlewareError(err.to_string())
        }
    }
}
