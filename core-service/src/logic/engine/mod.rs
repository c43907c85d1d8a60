//! Twin Engine
//!
//! One tick: source adapter → metrics + decision → history → frame.
//! Ticks are driven by `analysis_loop`; this module holds the state they
//! share.

pub mod frame;

#[cfg(test)]
mod tests;

pub use frame::Frame;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::logic::config::TwinConfig;
use crate::logic::events::FramePublisher;
use crate::logic::feed::{FeedListener, FeedStats, FeedStatus, RemoteSampleState};
use crate::logic::history::HistoryBuffer;
use crate::logic::metrics::{self, BillingConfig};
use crate::logic::model::{LoadedModel, ModelMetadata};
use crate::logic::telemetry::{read_sample, SourceMode};
use crate::logic::threat::DecisionEngine;

pub struct TwinEngine {
    billing: BillingConfig,
    refresh_interval: Duration,
    decision: DecisionEngine,
    history: HistoryBuffer,
    remote: Arc<RemoteSampleState>,
    feed: Option<FeedListener>,
    publisher: FramePublisher,
    tick_count: AtomicU64,
}

impl TwinEngine {
    pub fn new(config: &TwinConfig, model: LoadedModel, remote: Arc<RemoteSampleState>) -> Self {
        let feed = config
            .feed
            .enabled
            .then(|| FeedListener::new(config.feed.clone(), Arc::clone(&remote)));

        log::info!(
            "Twin engine ready: model={} ({:?}), history={} readings, feed={}",
            model.metadata().model_name,
            model.mode(),
            config.history_capacity,
            if feed.is_some() { "enabled" } else { "disabled" }
        );

        Self {
            billing: config.billing.clone(),
            refresh_interval: config.refresh_interval(),
            decision: DecisionEngine::new(model, config.thresholds.clone()),
            history: HistoryBuffer::new(config.history_capacity),
            remote,
            feed,
            publisher: FramePublisher::new(),
            tick_count: AtomicU64::new(0),
        }
    }

    /// Run one tick for the given source and publish the frame.
    ///
    /// Never fails and never waits on the network. Every tick nudges the
    /// listener, whatever the mode.
    pub fn tick(&self, mode: &SourceMode) -> Frame {
        if let Some(feed) = &self.feed {
            feed.ensure_connected();
        }

        let sample = read_sample(mode, &self.remote);
        let metrics = metrics::derive(&sample, &self.billing);
        let decision = self.decision.evaluate(&sample);

        self.history.append(metrics.power_watts);

        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = Frame {
            tick,
            timestamp: Utc::now(),
            source: *mode,
            sample,
            metrics,
            decision,
            history: self.history.snapshot(),
            feed_status: self.feed_status(),
        };

        if decision.is_anomaly() {
            log::warn!(
                "[ALERT] tick {} {:.1}V {:.2}A -> {} (theft probability {:.2}, {:?})",
                tick,
                sample.voltage,
                sample.current,
                decision.anomaly_label().as_str(),
                decision.theft_probability(),
                decision.confidence_mode()
            );
        } else {
            log::debug!(
                "tick {} {:.1}V {:.2}A {:.1}W -> SECURE",
                tick,
                sample.voltage,
                sample.current,
                metrics.power_watts
            );
        }

        self.publisher.publish(frame.clone());
        frame
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    pub fn publisher(&self) -> &FramePublisher {
        &self.publisher
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn remote_state(&self) -> &Arc<RemoteSampleState> {
        &self.remote
    }

    pub fn feed(&self) -> Option<&FeedListener> {
        self.feed.as_ref()
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.feed.as_ref().map(FeedListener::status).unwrap_or_default()
    }

    pub fn feed_stats(&self) -> FeedStats {
        self.feed.as_ref().map(FeedListener::stats).unwrap_or_default()
    }

    pub fn model_metadata(&self) -> &ModelMetadata {
        self.decision.model().metadata()
    }
}
