/*!
Live updates over the middleware websocket.

[`LiveFeed`] is an owned service with an explicit lifecycle: construct
it, `start()` it, `subscribe()` for events, `stop()` it. One supervisor
task holds the connection, subscribes to the configured channels and
fans incoming frames out on a broadcast channel; connection loss is
retried with exponential backoff until `stop()` is called. There is no
shared global instance; whoever needs live updates gets handed a feed
or a receiver.
*/

mod error;
mod feed;

pub use error::{LiveError, LiveResult};
pub use feed::{LiveEvent, LiveFeed, LiveFeedConfig};
