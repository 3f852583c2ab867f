use std::sync::Arc;

use async_trait::async_trait;
use plaza_types::ChainId;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use tracing::debug;

use crate::adapter::ChainAdapter;

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// The wrapped SOL mint, identical on every cluster
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Placeholder spellings for the native SOL token
const NATIVE_ALIASES: [&str; 2] = ["native", "sol"];

/// Configuration for the Solana adapter
#[derive(Debug, Clone)]
pub struct SolanaConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Commitment level for RPC calls
    pub commitment: CommitmentConfig,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

/// Adapter for the Solana chain, wrapping the nonblocking RPC client.
///
/// The client handle is shared: ledger scanning reuses it through
/// [`SolanaAdapter::rpc`] instead of opening a second connection pool.
pub struct SolanaAdapter {
    rpc: Arc<RpcClient>,
}

impl SolanaAdapter {
    pub fn new(config: Option<SolanaConfig>) -> Self {
        let config = config.unwrap_or_default();
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url,
            config.commitment,
        ));
        Self { rpc }
    }

    /// The underlying RPC client, for the ledger scanner and anything
    /// else that talks to the same endpoint.
    pub fn rpc(&self) -> Arc<RpcClient> {
        Arc::clone(&self.rpc)
    }
}

#[async_trait]
impl ChainAdapter for SolanaAdapter {
    fn id(&self) -> ChainId {
        ChainId::Solana
    }

    fn wrapped_native(&self) -> &str {
        WSOL_MINT
    }

    fn is_native_placeholder(&self, token: &str) -> bool {
        NATIVE_ALIASES
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(token))
    }

    async fn check_connection(&self) -> bool {
        match self.rpc.get_health().await {
            Ok(()) => true,
            Err(e) => {
                debug!("Solana health check failed: {}", e);
                false
            }
        }
    }
}
