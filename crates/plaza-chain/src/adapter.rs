use async_trait::async_trait;
use plaza_types::ChainId;

/// Capability contract every supported chain backend implements.
///
/// Methods stay deliberately small: anything chain-specific beyond them
/// (route building, RPC access) lives on the concrete adapter types.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Which chain this adapter speaks for
    fn id(&self) -> ChainId;

    /// Address of the wrapped form of the chain's native token
    fn wrapped_native(&self) -> &str;

    /// Whether `token` is a placeholder spelling for the native token
    /// rather than a real address
    fn is_native_placeholder(&self, token: &str) -> bool;

    /// Probes the chain's public endpoint. `false` covers both an
    /// unreachable endpoint and an unusable answer.
    async fn check_connection(&self) -> bool;
}
