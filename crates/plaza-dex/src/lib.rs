/*!
# Plaza DEX quoting

Route discovery and quote math for constant-product pools.

The math side is pure and works on reserve snapshots: marginal price
ratios, decimal-shift adjustment, compounded constant-product output and
price impact, all in fixed-point [`rust_decimal::Decimal`] (floats never
touch a quote). The routing side finds a usable pair path: an optional
backend route index is consulted first and its suggestions verified,
with on-chain discovery (direct pair, then two hops through the wrapped
native token) as the fallback.
*/

pub mod backend;
pub mod error;
pub mod math;
pub mod router;

pub use backend::{BackendConfig, RouteBackendClient};
pub use error::{DexError, DexResult};
pub use math::{
    price_impact_for_route, ratio_from_route, ratio_with_decimals, received_from_reserves,
    route_reserves,
};
pub use router::{PairLookup, RouteBuilder, RouterConfig};
