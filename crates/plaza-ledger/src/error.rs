use thiserror::Error;

/// Errors surfaced while scanning the ledger for posts.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The RPC node could not be reached or rejected the request.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// A signature string did not parse as a transaction signature.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// No post could be reconstructed for the requested signature.
    #[error("Post not found: {0}")]
    PostNotFound(String),
}

pub type ScanResult<T> = Result<T, ScanError>;

impl From<solana_client::client_error::ClientError> for ScanError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        ScanError::RpcError(err.to_string())
    }
}
