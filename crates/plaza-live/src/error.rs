use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

/// Errors inside a live feed session
#[derive(Error, Debug)]
pub enum LiveError {
    /// The websocket endpoint could not be reached or dropped us
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The endpoint spoke something other than the expected protocol
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}

pub type LiveResult<T> = Result<T, LiveError>;

impl From<WsError> for LiveError {
    fn from(err: WsError) -> Self {
        match err {
            WsError::Protocol(_) | WsError::Utf8 | WsError::Capacity(_) => {
                LiveError::ProtocolError(err.to_string())
            }
            _ => LiveError::ConnectionError(err.to_string()),
        }
    }
}
