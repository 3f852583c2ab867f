/*!
Ledger scanning for the plaza posting program.

Posts are not stored in accounts; they are reconstructed from transaction
history. [`FeedScanner`] pages through the posting program's signatures,
fetches each transaction, pulls the posting instruction out of whatever
encoding the RPC node returned, decodes the payload with `plaza-codec` and
resolves the referenced content with `plaza-content`.

Transactions that failed on chain, carry no posting instruction or carry an
undecodable payload are skipped, never surfaced as errors: a feed page is
best-effort over whatever the ledger holds.
*/

mod error;
mod locate;
mod scanner;

pub use error::{ScanError, ScanResult};
pub use scanner::{FeedScanner, HashPolicy, PostPage, ScannerConfig};
