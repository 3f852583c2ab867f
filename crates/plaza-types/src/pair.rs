use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One liquidity pair with a reserve snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairInfo {
    /// Pair contract address
    pub address: String,

    /// First pool token address
    pub token0: String,

    /// Second pool token address
    pub token1: String,

    /// Reserve held for `token0`
    pub reserve0: Decimal,

    /// Reserve held for `token1`
    pub reserve1: Decimal,
}

impl PairInfo {
    /// True when the pair holds the given token on either side
    pub fn contains(&self, token: &str) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// The opposite pool token, if `token` is one of the pair's sides
    pub fn other_token(&self, token: &str) -> Option<&str> {
        if self.token0 == token {
            Some(&self.token1)
        } else if self.token1 == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    /// Reserves oriented as (from, to) for a swap entering with `token`
    pub fn reserves_from(&self, token: &str) -> Option<(Decimal, Decimal)> {
        if self.token0 == token {
            Some((self.reserve0, self.reserve1))
        } else if self.token1 == token {
            Some((self.reserve1, self.reserve0))
        } else {
            None
        }
    }

    /// True when both reserves are strictly positive
    pub fn has_liquidity(&self) -> bool {
        self.reserve0 > Decimal::ZERO && self.reserve1 > Decimal::ZERO
    }
}

/// A swap route: the token path and the pair snapshot for each hop.
///
/// `path` always has at least two entries and `pairs` exactly one entry
/// per adjacent token pair in `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRoute {
    /// Token addresses from input to output
    pub path: Vec<String>,

    /// Pair snapshots, one per hop
    pub pairs: Vec<PairInfo>,
}

impl SwapRoute {
    /// Single-hop route over one pair
    pub fn direct(from: impl Into<String>, to: impl Into<String>, pair: PairInfo) -> Self {
        Self {
            path: vec![from.into(), to.into()],
            pairs: vec![pair],
        }
    }

    /// Number of hops in the route
    pub fn hop_count(&self) -> usize {
        self.pairs.len()
    }
}
