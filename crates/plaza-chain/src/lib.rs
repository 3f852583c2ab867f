/*!
Chain adapters.

The protocol spans two backends: posting lives on Solana, swapping on
aeternity. [`ChainAdapter`] is the one capability contract both implement;
[`AdapterRegistry`] selects an adapter by [`ChainId`] value. The set is
closed, an enum rather than a plugin surface, so chain-specific
capabilities (the aeternity route builder, the Solana RPC handle) stay
available through the concrete types.
*/

mod adapter;
mod aeternity;
mod error;
mod registry;
mod solana;

pub use adapter::ChainAdapter;
pub use aeternity::{AeternityAdapter, AeternityConfig, MiddlewareStatus};
pub use error::{ChainError, ChainResult};
pub use registry::AdapterRegistry;
pub use solana::{SolanaAdapter, SolanaConfig, WSOL_MINT};

pub use plaza_types::ChainId;
