use std::sync::Arc;

use plaza_types::ChainId;

use crate::adapter::ChainAdapter;
use crate::aeternity::AeternityAdapter;
use crate::solana::SolanaAdapter;

/// Holds one adapter per supported chain and selects by [`ChainId`].
///
/// The set is closed: both adapters always exist, so selection is total
/// and needs no fallible lookup. Concrete accessors keep chain-specific
/// capabilities reachable where the trait object is not enough.
pub struct AdapterRegistry {
    aeternity: Arc<AeternityAdapter>,
    solana: Arc<SolanaAdapter>,
}

impl AdapterRegistry {
    pub fn new(aeternity: AeternityAdapter, solana: SolanaAdapter) -> Self {
        Self {
            aeternity: Arc::new(aeternity),
            solana: Arc::new(solana),
        }
    }

    /// The adapter for `chain`, behind the capability contract.
    pub fn adapter(&self, chain: ChainId) -> Arc<dyn ChainAdapter> {
        match chain {
            ChainId::Aeternity => Arc::clone(&self.aeternity) as Arc<dyn ChainAdapter>,
            ChainId::Solana => Arc::clone(&self.solana) as Arc<dyn ChainAdapter>,
        }
    }

    pub fn aeternity(&self) -> &Arc<AeternityAdapter> {
        &self.aeternity
    }

    pub fn solana(&self) -> &Arc<SolanaAdapter> {
        &self.solana
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new(AeternityAdapter::new(None), SolanaAdapter::new(None))
    }
}
