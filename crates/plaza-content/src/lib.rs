/*!
# Plaza content resolution

Turns the URI stored in a posting instruction into displayable content.

Post URIs come in three flavors: gateway-resolvable schemes (`ipfs://`,
`ar://`), plain `http(s)` URLs, and inline payloads where the "URI" is
itself the content (a JSON document, a bare media URL, or plain text).
The resolver fetches what it can, falls back to a CORS proxy once, and
degrades to inline interpretation instead of failing: a feed should
render something for every post it finds.

Hash verification is surfaced, not enforced: `resolve_verified` reports
whether the bytes matched the on-chain hash and leaves the policy to the
caller.
*/

pub mod error;
pub mod gateway;
pub mod normalize;
pub mod resolver;

pub use error::{ContentError, ContentResult};
pub use gateway::gateway_url;
pub use normalize::{looks_like_media, normalize_value, parse_content};
pub use resolver::{ContentResolver, ContentSource, ResolvedContent, ResolverConfig};
