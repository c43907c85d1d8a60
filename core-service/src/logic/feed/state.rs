//! Remote Sample State
//!
//! Last known reading from the remote sensor plus the connectivity flag.
//! The listener writes it off the tick cadence; the tick loop reads it once
//! per tick. The reading is always replaced as one unit, so a reader never
//! sees voltage from one message and current from another.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::logic::telemetry::Sample;

/// Last accepted remote reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemoteReading {
    pub sample: Sample,
    /// `None` until the first message is accepted
    pub received_at: Option<DateTime<Utc>>,
}

impl Default for RemoteReading {
    fn default() -> Self {
        Self {
            sample: Sample::nominal(),
            received_at: None,
        }
    }
}

/// Shared cell between the feed listener and the tick loop
#[derive(Debug, Default)]
pub struct RemoteSampleState {
    latest: RwLock<RemoteReading>,
    connected: AtomicBool,
}

impl RemoteSampleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current reading. Never blocks on I/O.
    pub fn snapshot(&self) -> RemoteReading {
        *self.latest.read()
    }

    /// Replace the whole reading in one write.
    pub fn replace(&self, sample: Sample) {
        *self.latest.write() = RemoteReading {
            sample,
            received_at: Some(Utc::now()),
        };
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}
