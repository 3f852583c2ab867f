use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::LiveResult;

const DEFAULT_FEED_URL: &str = "wss://mainnet.aeternity.io/mdw/v2/websocket";
const DEFAULT_CHANNELS: [&str; 1] = ["Transactions"];
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;
const DEFAULT_MAX_RECONNECT_DELAY_SECS: u64 = 60;

/// Capacity of the broadcast buffer; slow receivers that fall further
/// behind than this see a `Lagged` error and skip ahead.
const EVENT_BUFFER: usize = 256;

/// Configuration for the live feed
#[derive(Debug, Clone)]
pub struct LiveFeedConfig {
    /// Websocket endpoint URL
    pub url: String,
    /// Channels to subscribe to after connecting
    pub channels: Vec<String>,
    /// How often to ping the endpoint to keep the connection alive
    pub ping_interval: Duration,
    /// Ceiling for the reconnect backoff delay
    pub max_reconnect_delay: Duration,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            channels: DEFAULT_CHANNELS.iter().map(|s| s.to_string()).collect(),
            ping_interval: Duration::from_secs(DEFAULT_PING_INTERVAL_SECS),
            max_reconnect_delay: Duration::from_secs(DEFAULT_MAX_RECONNECT_DELAY_SECS),
        }
    }
}

/// One frame from the feed, tagged with the channel it arrived on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    /// Channel (subscription name) the event belongs to
    pub channel: String,
    /// Frame payload as delivered by the endpoint
    pub payload: serde_json::Value,
}

// How one connection session ended.
enum SessionEnd {
    /// `stop()` was requested; do not reconnect
    Stopped,
    /// The connection was established and later lost; reconnect promptly
    Dropped,
}

/// Owned live-update service.
///
/// `start()` spawns a single supervisor task that connects, subscribes
/// and forwards frames to all receivers handed out by
/// [`Self::subscribe`]. Connection failures reconnect with exponential
/// backoff, reset after every successful connect. `stop()` ends the
/// task. Dropping the feed without `stop()` aborts nothing by itself;
/// owners are expected to stop what they start.
pub struct LiveFeed {
    config: LiveFeedConfig,
    events: broadcast::Sender<LiveEvent>,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LiveFeed {
    pub fn new(config: Option<LiveFeedConfig>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            config: config.unwrap_or_default(),
            events,
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    /// A new receiver for feed events. Receivers created before
    /// `start()` see everything from the first frame on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the supervisor task. Calling `start` on a running feed is
    /// a no-op.
    pub fn start(&self) -> LiveResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let config = self.config.clone();
        let events = self.events.clone();
        let running = Arc::clone(&self.running);
        let handle = tokio::spawn(async move {
            run_supervisor(config, events, running).await;
        });
        *self.task.lock().unwrap() = Some(handle);
        Ok(())
    }

    /// Flips the running flag and aborts the supervisor task.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

async fn run_supervisor(
    config: LiveFeedConfig,
    events: broadcast::Sender<LiveEvent>,
    running: Arc<AtomicBool>,
) {
    let mut backoff = reconnect_backoff(&config);
    while running.load(Ordering::SeqCst) {
        match run_session(&config, &events, &running).await {
            Ok(SessionEnd::Stopped) => break,
            Ok(SessionEnd::Dropped) => {
                warn!("Live feed connection to {} dropped", config.url);
                backoff.reset();
            }
            Err(e) => {
                warn!("Live feed connection to {} failed: {}", config.url, e);
            }
        }
        // max_elapsed_time is unset, so the schedule never runs out
        if let Some(delay) = backoff.next_backoff() {
            debug!("Reconnecting in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
    info!("Live feed for {} stopped", config.url);
}

async fn run_session(
    config: &LiveFeedConfig,
    events: &broadcast::Sender<LiveEvent>,
    running: &Arc<AtomicBool>,
) -> LiveResult<SessionEnd> {
    let (stream, _) = connect_async(&config.url).await?;
    info!("Live feed connected to {}", config.url);
    let (mut sink, mut source) = stream.split();

    for channel in &config.channels {
        let frame = json!({ "op": "Subscribe", "payload": channel });
        sink.send(Message::Text(frame.to_string())).await?;
    }

    let mut ping = tokio::time::interval(config.ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; consume it so pings start one
    // interval from now.
    ping.tick().await;

    loop {
        if !running.load(Ordering::SeqCst) {
            let _ = sink.send(Message::Close(None)).await;
            return Ok(SessionEnd::Stopped);
        }
        tokio::select! {
            _ = ping.tick() => {
                sink.send(Message::Ping(Vec::new())).await?;
            }
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => forward_frame(&text, events),
                Some(Ok(Message::Ping(data))) => sink.send(Message::Pong(data)).await?,
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Dropped),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
        }
    }
}

// Parses a frame and fans it out. Frames that are not JSON are dropped;
// a send error only means nobody is listening right now.
fn forward_frame(text: &str, events: &broadcast::Sender<LiveEvent>) {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Ignoring unparseable live frame: {}", e);
            return;
        }
    };
    let channel = value
        .get("subscription")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let payload = value.get("payload").cloned().unwrap_or(value);
    let _ = events.send(LiveEvent { channel, payload });
}

fn reconnect_backoff(config: &LiveFeedConfig) -> ExponentialBackoff {
    ExponentialBackoff {
        max_interval: config.max_reconnect_delay,
        max_elapsed_time: None,
        ..ExponentialBackoff::default()
    }
}
