//! Remote Feed Listener
//!
//! Background MQTT subscriber keeping `RemoteSampleState` current.
//!
//! - One session at a time: the connected flag and the in-flight flag both
//!   guard against duplicate subscriptions across ticks.
//! - A failed or dropped session clears the flag; the next tick retries.
//!   No retry cap, no backoff.
//! - Malformed messages are dropped and never touch the shared state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::Serialize;

use super::payload::parse_payload;
use super::state::RemoteSampleState;
use super::{FeedError, FeedStatus};
use crate::logic::config::FeedConfig;

/// Capacity of the rumqttc request channel
const REQUEST_CHANNEL_CAPACITY: usize = 10;

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Default)]
struct FeedCounters {
    connection_attempts: AtomicU64,
    messages_received: AtomicU64,
    messages_accepted: AtomicU64,
    messages_dropped: AtomicU64,
}

/// Listener counters for the status indicator
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedStats {
    pub status: FeedStatus,
    pub connection_attempts: u64,
    pub messages_received: u64,
    pub messages_accepted: u64,
    pub messages_dropped: u64,
}

// ============================================================================
// LISTENER
// ============================================================================

/// Handle to the feed subscription. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FeedListener {
    config: FeedConfig,
    state: Arc<RemoteSampleState>,
    in_flight: Arc<AtomicBool>,
    counters: Arc<FeedCounters>,
}

impl FeedListener {
    pub fn new(config: FeedConfig, state: Arc<RemoteSampleState>) -> Self {
        Self {
            config,
            state,
            in_flight: Arc::new(AtomicBool::new(false)),
            counters: Arc::new(FeedCounters::default()),
        }
    }

    pub fn state(&self) -> &Arc<RemoteSampleState> {
        &self.state
    }

    pub fn status(&self) -> FeedStatus {
        if self.state.is_connected() {
            FeedStatus::Connected
        } else if self.in_flight.load(Ordering::Acquire) {
            FeedStatus::Connecting
        } else {
            FeedStatus::Disconnected
        }
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats {
            status: self.status(),
            connection_attempts: self.counters.connection_attempts.load(Ordering::Relaxed),
            messages_received: self.counters.messages_received.load(Ordering::Relaxed),
            messages_accepted: self.counters.messages_accepted.load(Ordering::Relaxed),
            messages_dropped: self.counters.messages_dropped.load(Ordering::Relaxed),
        }
    }

    /// Start a session unless one is connected or already being set up.
    ///
    /// Called once per tick in remote mode. Never blocks: the session runs
    /// on the current tokio runtime. Outside a runtime this is a no-op.
    pub fn ensure_connected(&self) {
        if !self.config.enabled || self.state.is_connected() {
            return;
        }

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::debug!("Feed: no async runtime, skipping connection attempt");
                self.in_flight.store(false, Ordering::Release);
                return;
            }
        };

        let attempt = self.counters.connection_attempts.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!(
            "Feed: connecting to {}:{} (attempt {})",
            self.config.broker_host,
            self.config.broker_port,
            attempt
        );

        let listener = self.clone();
        handle.spawn(async move {
            if let Err(e) = listener.run_session().await {
                log::debug!("Feed session ended: {}", e);
            }
            listener.state.set_connected(false);
            listener.in_flight.store(false, Ordering::Release);
        });
    }

    /// One MQTT session: connect, subscribe, pump messages until an error.
    async fn run_session(&self) -> Result<(), FeedError> {
        let client_id = format!("{}-{}", self.config.client_id_prefix, uuid::Uuid::new_v4().simple());
        let mut options = MqttOptions::new(
            client_id,
            self.config.broker_host.clone(),
            self.config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(self.config.keep_alive_secs));

        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
        client
            .subscribe(self.config.topic.clone(), QoS::AtMostOnce)
            .await
            .map_err(|e| FeedError::Subscribe(e.to_string()))?;

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    self.state.set_connected(true);
                    self.in_flight.store(false, Ordering::Release);
                    log::info!(
                        "📡 Feed connected: {}:{} topic '{}'",
                        self.config.broker_host,
                        self.config.broker_port,
                        self.config.topic
                    );
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.handle_message(&publish.payload);
                }
                Ok(_) => {}
                Err(e) => {
                    if self.state.is_connected() {
                        log::warn!("Feed connection lost: {}", e);
                    }
                    return Err(FeedError::Connection(e.to_string()));
                }
            }
        }
    }

    /// Apply one payload to the shared state. Returns whether it was accepted.
    pub fn handle_message(&self, payload: &[u8]) -> bool {
        self.counters.messages_received.fetch_add(1, Ordering::Relaxed);

        match parse_payload(payload) {
            Ok(sample) => {
                self.state.replace(sample);
                self.counters.messages_accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                self.counters.messages_dropped.fetch_add(1, Ordering::Relaxed);
                log::debug!("Feed: dropped malformed payload ({})", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::telemetry::Sample;

    fn listener_with(config: FeedConfig) -> FeedListener {
        FeedListener::new(config, Arc::new(RemoteSampleState::new()))
    }

    fn unreachable_config() -> FeedConfig {
        FeedConfig {
            broker_host: "127.0.0.1".to_string(),
            broker_port: 1,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn test_valid_message_updates_state() {
        let listener = listener_with(FeedConfig::default());

        assert!(listener.handle_message(br#"{"voltage": 227.0, "current": 3.5}"#));
        assert_eq!(listener.state().snapshot().sample, Sample::new(227.0, 3.5));

        let stats = listener.stats();
        assert_eq!(stats.messages_received, 1);
        assert_eq!(stats.messages_accepted, 1);
    }

    #[test]
    fn test_malformed_message_leaves_state_unchanged() {
        let listener = listener_with(FeedConfig::default());
        listener.handle_message(br#"{"voltage": 240.0, "current": 1.0}"#);
        let before = listener.state().snapshot();

        assert!(!listener.handle_message(b"{\"voltage\": 10"));
        assert!(!listener.handle_message(br#"{"current": 9.0}"#));
        assert!(!listener.handle_message(br#"{"voltage": "x", "current": 9.0}"#));

        assert_eq!(listener.state().snapshot(), before);
        assert_eq!(listener.stats().messages_dropped, 3);
    }

    #[test]
    fn test_disabled_feed_never_connects() {
        let config = FeedConfig {
            enabled: false,
            ..FeedConfig::default()
        };
        let listener = listener_with(config);
        listener.ensure_connected();

        assert_eq!(listener.status(), FeedStatus::Disconnected);
        assert_eq!(listener.stats().connection_attempts, 0);
    }

    #[test]
    fn test_no_runtime_is_noop() {
        let listener = listener_with(unreachable_config());
        listener.ensure_connected();

        assert_eq!(listener.status(), FeedStatus::Disconnected);
        assert_eq!(listener.stats().connection_attempts, 0);
    }

    #[tokio::test]
    async fn test_duplicate_attempts_guarded() {
        let listener = listener_with(unreachable_config());

        listener.ensure_connected();
        listener.ensure_connected();
        listener.ensure_connected();

        assert_eq!(listener.stats().connection_attempts, 1);
        assert_eq!(listener.status(), FeedStatus::Connecting);
    }

    #[tokio::test]
    async fn test_failed_connection_retried_next_tick() {
        let listener = listener_with(unreachable_config());
        listener.ensure_connected();

        let settled = tokio::time::timeout(Duration::from_secs(10), async {
            while listener.status() != FeedStatus::Disconnected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(settled.is_ok(), "connection attempt never settled");
        assert!(!listener.state().is_connected());

        listener.ensure_connected();
        assert_eq!(listener.stats().connection_attempts, 2);
    }
}
