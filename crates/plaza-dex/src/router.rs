use async_trait::async_trait;
use plaza_types::{PairInfo, SwapRoute};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::{BackendConfig, RouteBackendClient};
use crate::error::{DexError, DexResult};

/// On-chain pair existence and reserve lookup, implemented per chain
#[async_trait]
pub trait PairLookup: Send + Sync {
    /// The pair holding both tokens with a current reserve snapshot, if
    /// one exists on chain.
    async fn pair_with_reserves(
        &self,
        token_a: &str,
        token_b: &str,
    ) -> DexResult<Option<PairInfo>>;
}

/// Configuration for route discovery
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// The wrapped form of the chain's native token; also the pivot for
    /// two-hop routes
    pub wrapped_native: String,
    /// Placeholder spellings users pass for the native token, mapped
    /// onto `wrapped_native` before discovery
    pub native_aliases: Vec<String>,
    /// Route index backend; `None` goes straight to on-chain discovery
    pub backend: Option<BackendConfig>,
}

impl RouterConfig {
    pub fn new(wrapped_native: impl Into<String>) -> Self {
        Self {
            wrapped_native: wrapped_native.into(),
            native_aliases: vec!["native".to_string()],
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.native_aliases.push(alias.into());
        self
    }
}

/// Finds a usable swap route between two tokens.
pub struct RouteBuilder {
    lookup: Arc<dyn PairLookup>,
    backend: Option<RouteBackendClient>,
    config: RouterConfig,
}

impl RouteBuilder {
    pub fn new(lookup: Arc<dyn PairLookup>, config: RouterConfig) -> Self {
        let backend = config
            .backend
            .clone()
            .map(|cfg| RouteBackendClient::new(Some(cfg)));
        Self {
            lookup,
            backend,
            config,
        }
    }

    /// Best route from `from` to `to`.
    ///
    /// The backend index is consulted first when configured; its
    /// suggestions are used only after verifying they chain hop to hop,
    /// terminate at the output token and carry liquidity. On-chain
    /// fallback checks the direct pair, then the two-hop path through
    /// the wrapped native token. [`DexError::NoRoute`] is the
    /// recoverable "nothing to offer" outcome.
    pub async fn best_route(&self, from: &str, to: &str) -> DexResult<SwapRoute> {
        let from = self.canonical_token(from).to_string();
        let to = self.canonical_token(to).to_string();
        if from == to {
            return Err(DexError::InvalidRoute(
                "input and output token are the same".to_string(),
            ));
        }

        if let Some(backend) = &self.backend {
            match backend.swap_routes(&from, &to).await {
                Ok(candidates) => {
                    for pairs in candidates {
                        if let Some(route) = validate_candidate(&from, &to, pairs) {
                            return Ok(route);
                        }
                    }
                    debug!("No usable backend route for {} -> {}", from, to);
                }
                Err(e) => {
                    warn!(
                        "Route backend unavailable ({}), falling back to on-chain discovery",
                        e
                    );
                }
            }
        }

        self.discover_on_chain(&from, &to).await
    }

    /// Maps native placeholder spellings onto the wrapped native token.
    fn canonical_token<'a>(&'a self, token: &'a str) -> &'a str {
        if self
            .config
            .native_aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(token))
        {
            &self.config.wrapped_native
        } else {
            token
        }
    }

    async fn discover_on_chain(&self, from: &str, to: &str) -> DexResult<SwapRoute> {
        if let Some(pair) = self.lookup.pair_with_reserves(from, to).await? {
            if pair.has_liquidity() {
                return Ok(SwapRoute::direct(from, to, pair));
            }
            debug!("Direct pair {} has no liquidity", pair.address);
        }

        let wrapped = self.config.wrapped_native.as_str();
        if from != wrapped && to != wrapped {
            let first = self.lookup.pair_with_reserves(from, wrapped).await?;
            let second = self.lookup.pair_with_reserves(wrapped, to).await?;
            if let (Some(first), Some(second)) = (first, second) {
                if first.has_liquidity() && second.has_liquidity() {
                    return Ok(SwapRoute {
                        path: vec![from.to_string(), wrapped.to_string(), to.to_string()],
                        pairs: vec![first, second],
                    });
                }
            }
        }

        Err(DexError::NoRoute(format!("{} -> {}", from, to)))
    }
}

/// Checks one backend candidate: every hop must have liquidity and chain
/// onto the previous one, and the walk must end at `to`. Candidates are
/// accepted in either end-to-end direction.
fn validate_candidate(from: &str, to: &str, pairs: Vec<PairInfo>) -> Option<SwapRoute> {
    if pairs.is_empty() {
        return None;
    }
    walk_candidate(from, to, &pairs).or_else(|| {
        let mut reversed = pairs;
        reversed.reverse();
        walk_candidate(from, to, &reversed)
    })
}

fn walk_candidate(from: &str, to: &str, pairs: &[PairInfo]) -> Option<SwapRoute> {
    let mut path = vec![from.to_string()];
    let mut token = from.to_string();
    for pair in pairs {
        if !pair.has_liquidity() {
            return None;
        }
        let next = pair.other_token(&token)?;
        path.push(next.to_string());
        token = next.to_string();
    }
    if token != to {
        return None;
    }
    Some(SwapRoute {
        path,
        pairs: pairs.to_vec(),
    })
}
