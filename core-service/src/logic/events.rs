//! Frame Publisher
//!
//! Two views of the tick output:
//! - `latest()` / `subscribe()`: watch channel holding the most recent frame,
//!   for read-only consumers that only care about current state
//! - `subscribe_frames()`: broadcast stream of every frame, for sinks that
//!   must see each tick (the JSON line printer)

use tokio::sync::{broadcast, watch};

use crate::logic::engine::Frame;

/// Frames buffered per stream subscriber before it starts lagging
pub const FRAME_STREAM_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct FramePublisher {
    sender: watch::Sender<Option<Frame>>,
    stream: broadcast::Sender<Frame>,
}

impl FramePublisher {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        let (stream, _) = broadcast::channel(FRAME_STREAM_CAPACITY);
        Self { sender, stream }
    }

    /// Queue the frame for stream subscribers and replace the latest frame
    pub fn publish(&self, frame: Frame) {
        // No stream subscribers is fine
        let _ = self.stream.send(frame.clone());
        self.sender.send_replace(Some(frame));
    }

    /// Latest-frame view
    pub fn subscribe(&self) -> watch::Receiver<Option<Frame>> {
        self.sender.subscribe()
    }

    /// Every frame published after this call, in order
    pub fn subscribe_frames(&self) -> broadcast::Receiver<Frame> {
        self.stream.subscribe()
    }

    pub fn latest(&self) -> Option<Frame> {
        self.sender.borrow().clone()
    }
}

impl Default for FramePublisher {
    fn default() -> Self {
        Self::new()
    }
}
