use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use plaza_dex::{
    BackendConfig, DexResult, PairLookup, RouteBackendClient, RouteBuilder, RouterConfig,
};
use plaza_types::{ChainId, PairInfo};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::adapter::ChainAdapter;
use crate::error::ChainResult;

const DEFAULT_MIDDLEWARE_URL: &str = "https://mainnet.aeternity.io/mdw";

/// Mainnet WAE contract, the wrapped form of AE
const DEFAULT_WRAPPED_AE: &str = "ct_J3zBY8xxjsRr3QojETNw48Eb38fjvEuJKkQ6KzECvubvEcvnm";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Placeholder spellings for the native AE token
const NATIVE_ALIASES: [&str; 2] = ["native", "ae"];

/// Configuration for the aeternity adapter
#[derive(Debug, Clone)]
pub struct AeternityConfig {
    /// Middleware base URL, no trailing slash
    pub middleware_url: String,
    /// Wrapped-native (WAE) contract address, the routing pivot
    pub wrapped_native: String,
    /// DEX backend serving the pair and route index
    pub dex_backend: BackendConfig,
    /// Timeout for middleware requests
    pub request_timeout: Duration,
}

impl Default for AeternityConfig {
    fn default() -> Self {
        Self {
            middleware_url: DEFAULT_MIDDLEWARE_URL.to_string(),
            wrapped_native: DEFAULT_WRAPPED_AE.to_string(),
            dex_backend: BackendConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Subset of the middleware status document the adapter reads
#[derive(Debug, Clone, Deserialize)]
pub struct MiddlewareStatus {
    #[serde(default)]
    pub mdw_version: Option<String>,
    #[serde(default)]
    pub node_version: Option<String>,
    #[serde(default)]
    pub mdw_synced: bool,
    #[serde(default)]
    pub node_height: Option<u64>,
}

/// Adapter for the aeternity chain: middleware health, native-token
/// mapping and the swap route machinery.
pub struct AeternityAdapter {
    config: AeternityConfig,
    http_client: HttpClient,
    dex_backend: RouteBackendClient,
}

impl AeternityAdapter {
    pub fn new(config: Option<AeternityConfig>) -> Self {
        let config = config.unwrap_or_default();
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        let dex_backend = RouteBackendClient::new(Some(config.dex_backend.clone()));
        Self {
            config,
            http_client,
            dex_backend,
        }
    }

    /// Fetches the middleware status document.
    pub async fn middleware_status(&self) -> ChainResult<MiddlewareStatus> {
        let url = format!("{}/v2/status", self.config.middleware_url);
        debug!("Checking middleware status at {}", url);
        let status = self
            .http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<MiddlewareStatus>()
            .await?;
        Ok(status)
    }

    /// A route builder wired to this adapter: native aliases map to the
    /// configured WAE address, pair lookups go through the DEX backend.
    pub fn router(self: &Arc<Self>) -> RouteBuilder {
        let mut config = RouterConfig::new(self.config.wrapped_native.clone())
            .with_backend(self.config.dex_backend.clone());
        for alias in NATIVE_ALIASES {
            if !config.native_aliases.iter().any(|known| known == alias) {
                config = config.with_alias(alias);
            }
        }
        RouteBuilder::new(Arc::clone(self) as Arc<dyn PairLookup>, config)
    }
}

#[async_trait]
impl ChainAdapter for AeternityAdapter {
    fn id(&self) -> ChainId {
        ChainId::Aeternity
    }

    fn wrapped_native(&self) -> &str {
        &self.config.wrapped_native
    }

    fn is_native_placeholder(&self, token: &str) -> bool {
        NATIVE_ALIASES
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(token))
    }

    async fn check_connection(&self) -> bool {
        self.middleware_status().await.is_ok()
    }
}

#[async_trait]
impl PairLookup for AeternityAdapter {
    /// The DEX backend indexes every pair; a direct pair shows up as a
    /// single-hop route candidate carrying its reserve snapshot.
    async fn pair_with_reserves(
        &self,
        token_a: &str,
        token_b: &str,
    ) -> DexResult<Option<PairInfo>> {
        let routes = self.dex_backend.swap_routes(token_a, token_b).await?;
        Ok(routes
            .into_iter()
            .filter(|route| route.len() == 1)
            .flatten()
            .find(|pair| pair.contains(token_a) && pair.contains(token_b)))
    }
}
