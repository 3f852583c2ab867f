//! Common types shared between the plaza crates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod content;
pub mod pair;
pub mod post;

/// Re-exports
pub use content::NormalizedContent;
pub use pair::{PairInfo, SwapRoute};
pub use post::{Post, PostKind};

/// Error for values shared across crates
#[derive(Debug, thiserror::Error)]
pub enum SharedError {
    /// Chain id string did not match a supported chain
    #[error("Unknown chain: {0}")]
    UnknownChain(String),
}

/// Chains the client suite knows how to talk to.
///
/// This is a closed set: adding a chain means adding a variant and an
/// adapter, not registering a string key at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Aeternity,
    Solana,
}

impl ChainId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Aeternity => "aeternity",
            ChainId::Solana => "solana",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aeternity" => Ok(ChainId::Aeternity),
            "solana" => Ok(ChainId::Solana),
            other => Err(SharedError::UnknownChain(other.to_string())),
        }
    }
}
