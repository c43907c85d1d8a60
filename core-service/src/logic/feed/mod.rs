//! Remote Feed Module - Sensor to Twin Communication
//!
//! This module handles:
//! - MQTT subscription to the meter topic
//! - Payload parsing (`{"voltage": .., "current": ..}`)
//! - The shared last-known-sample cell read by the tick loop

pub mod listener;
pub mod payload;
pub mod state;

pub use listener::{FeedListener, FeedStats};
pub use payload::parse_payload;
pub use state::{RemoteReading, RemoteSampleState};

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Process-wide remote state, shared by the listener and the tick loop
static REMOTE_STATE: Lazy<Arc<RemoteSampleState>> = Lazy::new(|| Arc::new(RemoteSampleState::new()));

/// Handle to the process-wide remote state
pub fn global_state() -> Arc<RemoteSampleState> {
    Arc::clone(&REMOTE_STATE)
}

/// Connectivity indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl FeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedStatus::Disconnected => "DISCONNECTED",
            FeedStatus::Connecting => "CONNECTING...",
            FeedStatus::Connected => "CONNECTED",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("payload is not a telemetry record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field '{0}' is not a finite number")]
    InvalidField(&'static str),

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("connection error: {0}")]
    Connection(String),
}
