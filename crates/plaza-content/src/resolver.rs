use plaza_types::NormalizedContent;
use reqwest::Client as HttpClient;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ContentError, ContentResult};
use crate::gateway::gateway_url;
use crate::normalize::parse_content;

const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const DEFAULT_ARWEAVE_GATEWAY: &str = "https://arweave.net/";
const DEFAULT_CORS_PROXY_PREFIX: &str = "https://corsproxy.io/?";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for content fetching
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Gateway prefix for `ipfs://` URIs
    pub ipfs_gateway: String,
    /// Gateway prefix for `ar://` URIs
    pub arweave_gateway: String,
    /// Prefix prepended to a URL for the one proxy retry; empty disables
    /// the retry
    pub cors_proxy_prefix: String,
    /// Overall per-request timeout
    pub request_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
            arweave_gateway: DEFAULT_ARWEAVE_GATEWAY.to_string(),
            cors_proxy_prefix: DEFAULT_CORS_PROXY_PREFIX.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Where the resolved bytes came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// Fetched from the gateway URL directly
    Direct,
    /// Fetched through the CORS proxy after a direct failure
    Proxy,
    /// The URI itself was interpreted as the content
    Inline,
}

/// A resolved post body plus the bytes that back it
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    /// Normalized displayable content
    pub content: NormalizedContent,
    /// The exact bytes the content was derived from; for inline content
    /// these are the URI's UTF-8 bytes
    pub raw: Vec<u8>,
    /// How the bytes were obtained
    pub source: ContentSource,
    /// Whether `raw` hashed to the expected on-chain hash; `None` when no
    /// hash was supplied
    pub hash_matches: Option<bool>,
}

/// Fetches and normalizes post content.
///
/// Resolution never fails: a URI that cannot be fetched (or is not
/// fetchable to begin with) is interpreted inline.
pub struct ContentResolver {
    config: ResolverConfig,
    http_client: HttpClient,
}

impl ContentResolver {
    pub fn new(config: Option<ResolverConfig>) -> Self {
        let config = config.unwrap_or_default();
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            config,
            http_client,
        }
    }

    /// Resolves a post URI: direct fetch, one CORS proxy retry, inline
    /// fallback.
    pub async fn resolve(&self, uri: &str) -> ResolvedContent {
        if let Some(url) = gateway_url(
            uri,
            &self.config.ipfs_gateway,
            &self.config.arweave_gateway,
        ) {
            match self.fetch_with_proxy_retry(&url).await {
                Ok((raw, source)) => {
                    let body = String::from_utf8_lossy(&raw);
                    let content = parse_content(&body);
                    return ResolvedContent {
                        content,
                        raw,
                        source,
                        hash_matches: None,
                    };
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}. Falling back to inline content", url, e);
                }
            }
        }

        ResolvedContent {
            content: parse_content(uri),
            raw: uri.as_bytes().to_vec(),
            source: ContentSource::Inline,
            hash_matches: None,
        }
    }

    /// Like [`resolve`](Self::resolve), additionally comparing the bytes
    /// against the on-chain content hash. A mismatch is reported, never
    /// enforced here; strict callers decide what to do with it.
    pub async fn resolve_verified(&self, uri: &str, expected_hash: &[u8; 32]) -> ResolvedContent {
        let mut resolved = self.resolve(uri).await;
        let digest = Sha256::digest(&resolved.raw);
        let matches = digest.as_slice() == expected_hash;
        if !matches {
            warn!(
                "Content hash mismatch for {}: on-chain {}, resolved {}",
                uri,
                hex::encode(expected_hash),
                hex::encode(digest)
            );
        }
        resolved.hash_matches = Some(matches);
        resolved
    }

    async fn fetch_with_proxy_retry(&self, url: &str) -> ContentResult<(Vec<u8>, ContentSource)> {
        match self.fetch_bytes(url).await {
            Ok(raw) => Ok((raw, ContentSource::Direct)),
            Err(e) if self.config.cors_proxy_prefix.is_empty() => Err(e),
            Err(e) => {
                debug!("Direct fetch of {} failed ({}), retrying through proxy", url, e);
                let proxied = format!("{}{}", self.config.cors_proxy_prefix, url);
                let raw = self.fetch_bytes(&proxied).await?;
                Ok((raw, ContentSource::Proxy))
            }
        }
    }

    async fn fetch_bytes(&self, url: &str) -> ContentResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ContentError::GatewayError(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
