use thiserror::Error;

/// DEX quoting errors
#[derive(Debug, Error)]
pub enum DexError {
    /// No usable route between the requested tokens. Recoverable: the
    /// caller surfaces it as "no route found", not as a failure.
    #[error("No route: {0}")]
    NoRoute(String),

    /// A route that does not chain hop to hop or lacks liquidity
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Quote math could not be evaluated
    #[error("Math error: {0}")]
    MathError(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Route backend answered with an error
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// DEX result type
pub type DexResult<T> = Result<T, DexError>;

impl From<reqwest::Error> for DexError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            DexError::ConnectionError(format!("Connection timeout: {}", error))
        } else if error.is_connect() {
            DexError::ConnectionError(format!("Connection error: {}", error))
        } else {
            DexError::ConnectionError(format!("HTTP error: {}", error))
        }
    }
}
