use plaza_types::PairInfo;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::debug;

use crate::error::{DexError, DexResult};

const DEFAULT_BACKEND_URL: &str = "https://dex-backend-mainnet.prd.aepps.com";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 5;

/// Configuration for the route index backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base URL, no trailing slash
    pub base_url: String,
    /// Overall per-request timeout
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }
}

/// Client for the backend's precomputed route index.
///
/// The backend is an optimization, not an authority: whatever it returns
/// is re-validated by the route builder before use.
pub struct RouteBackendClient {
    config: BackendConfig,
    http_client: HttpClient,
}

impl RouteBackendClient {
    pub fn new(config: Option<BackendConfig>) -> Self {
        let config = config.unwrap_or_default();
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            config,
            http_client,
        }
    }

    /// Candidate routes from `from` to `to`, each a list of pairs with
    /// reserve snapshots.
    pub async fn swap_routes(&self, from: &str, to: &str) -> DexResult<Vec<Vec<PairInfo>>> {
        let url = format!("{}/swap-routes/{}/{}", self.config.base_url, from, to);
        debug!("Fetching swap routes from {}", url);

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DexError::BackendError(format!(
                "route index returned {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            DexError::SerializationError(format!("Failed to parse route response: {}", e))
        })
    }
}
