use thiserror::Error;

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// URI does not fit the layout's buffer
    #[error("URI too long: {0}")]
    UriTooLong(String),

    /// Content hash was not exactly 32 bytes
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    /// Payload shorter than the smallest decodable layout
    #[error("Payload too short: {0}")]
    PayloadTooShort(String),

    /// Structurally invalid payload
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Codec result type
pub type CodecResult<T> = Result<T, CodecError>;
