//! End-to-end tick tests: source → metrics + decision → history → frame

use std::sync::Arc;

use super::TwinEngine;
use crate::logic::config::TwinConfig;
use crate::logic::feed::{FeedListener, FeedStatus, RemoteSampleState};
use crate::logic::model::{self, ConfidenceMode, LoadedModel};
use crate::logic::telemetry::{Sample, Scenario, SourceMode};
use crate::logic::threat::{AnomalyLabel, Verdict};

// ============================================================================
// HELPERS
// ============================================================================

fn offline_config() -> TwinConfig {
    let mut config = TwinConfig::default();
    config.feed.enabled = false;
    config.model.path = None;
    config
}

/// Engine on the synthetic nominal model, feed disabled
fn nominal_engine() -> TwinEngine {
    let config = offline_config();
    let model = model::load(&config.model);
    assert_eq!(model.mode(), ConfidenceMode::Fallback);
    TwinEngine::new(&config, model, Arc::new(RemoteSampleState::new()))
}

// ============================================================================
// E2E
// ============================================================================

#[test]
fn test_nominal_reading_is_secure() {
    let engine = nominal_engine();
    let frame = engine.tick(&SourceMode::manual(230.0, 5.0));

    assert_eq!(frame.decision.verdict(), Verdict::Secure);
    assert!(!frame.decision.is_anomaly());
    assert!((frame.decision.theft_probability() - 0.05).abs() < 1e-9);
    assert_eq!(frame.decision.health_index(), 1.0);
    assert!((frame.metrics.power_watts - 1150.0).abs() < 1e-9);
    assert_eq!(frame.decision.confidence_mode(), ConfidenceMode::Fallback);
}

#[test]
fn test_voltage_drop_alerts() {
    let engine = nominal_engine();
    let frame = engine.tick(&SourceMode::manual(15.0, 0.0));

    assert_eq!(frame.decision.verdict(), Verdict::Alert);
    assert_eq!(frame.decision.anomaly_label(), AnomalyLabel::VoltageDrop);
    assert!((frame.decision.theft_probability() - 0.98).abs() < 1e-9);
    assert_eq!(frame.metrics.power_watts, 0.0);
}

#[test]
fn test_heavy_load_alerts() {
    let config = offline_config();
    let engine = TwinEngine::new(
        &config,
        model::load(&config.model),
        Arc::new(RemoteSampleState::new()),
    );

    // Manual controls cap current at 20A, so feed the remote cell directly
    engine.remote_state().replace(Sample::new(220.0, 35.0));
    let frame = engine.tick(&SourceMode::Remote);

    assert!(frame.decision.is_anomaly());
    assert_eq!(frame.decision.anomaly_label(), AnomalyLabel::Overload);
    assert!((frame.metrics.power_watts - 7700.0).abs() < 1e-9);
    assert!(frame.metrics.solar_export_watts > 0.0);
}

#[test]
fn test_scenarios_end_to_end() {
    let engine = nominal_engine();

    let normal = engine.tick(&SourceMode::scenario(Scenario::Normal));
    assert_eq!(normal.decision.verdict(), Verdict::Secure);

    let wire_cut = engine.tick(&SourceMode::scenario(Scenario::WireCut));
    assert_eq!(wire_cut.decision.anomaly_label(), AnomalyLabel::VoltageDrop);

    let overload = engine.tick(&SourceMode::scenario(Scenario::Overload));
    assert!(overload.decision.is_anomaly());

    // Low current at nominal voltage sits outside the nominal envelope
    let theft = engine.tick(&SourceMode::scenario(Scenario::Theft));
    assert_eq!(theft.decision.anomaly_label(), AnomalyLabel::PatternDeviation);
}

#[test]
fn test_threshold_only_still_enforces_band() {
    let mut config = offline_config();
    config.model.train_fallback = false;
    let model = model::load(&config.model);
    assert_eq!(model.mode(), ConfidenceMode::ThresholdOnly);

    let engine = TwinEngine::new(&config, model, Arc::new(RemoteSampleState::new()));

    let low = engine.tick(&SourceMode::manual(150.0, 5.0));
    assert!(low.decision.is_anomaly());
    assert_eq!(low.decision.confidence_mode(), ConfidenceMode::ThresholdOnly);

    let high = engine.tick(&SourceMode::manual(260.0, 5.0));
    assert!(high.decision.is_anomaly());

    let nominal = engine.tick(&SourceMode::manual(230.0, 5.0));
    assert!(!nominal.decision.is_anomaly());
}

// ============================================================================
// REMOTE MODE
// ============================================================================

#[test]
fn test_remote_mode_reads_listener_state() {
    let config = offline_config();
    let remote = Arc::new(RemoteSampleState::new());
    let engine = TwinEngine::new(&config, LoadedModel::unavailable(), Arc::clone(&remote));

    // Before any message: nominal default
    let first = engine.tick(&SourceMode::Remote);
    assert_eq!(first.sample, Sample::nominal());

    let listener = FeedListener::new(config.feed.clone(), Arc::clone(&remote));
    assert!(listener.handle_message(br#"{"voltage": 228.4, "current": 6.1}"#));

    let second = engine.tick(&SourceMode::Remote);
    assert_eq!(second.sample, Sample::new(228.4, 6.1));

    // Malformed payload leaves the previous sample in place
    assert!(!listener.handle_message(b"{\"voltage\": 1}"));
    let third = engine.tick(&SourceMode::Remote);
    assert_eq!(third.sample, second.sample);
}

#[test]
fn test_remote_tick_is_idempotent() {
    let engine = nominal_engine();
    engine.remote_state().replace(Sample::new(231.0, 4.8));

    let a = engine.tick(&SourceMode::Remote);
    let b = engine.tick(&SourceMode::Remote);
    assert_eq!(a.sample, b.sample);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.decision, b.decision);
}

#[tokio::test]
async fn test_feed_subscribed_outside_remote_mode() {
    let mut config = offline_config();
    config.feed.enabled = true;
    config.feed.broker_host = "127.0.0.1".to_string();
    config.feed.broker_port = 1;
    let engine = TwinEngine::new(&config, LoadedModel::unavailable(), Arc::new(RemoteSampleState::new()));

    for _ in 0..3 {
        engine.tick(&SourceMode::manual(230.0, 5.0));
    }

    // One session in flight, not one per tick
    assert_eq!(engine.feed_stats().connection_attempts, 1);
    assert_eq!(engine.feed_status(), FeedStatus::Connecting);
}

#[test]
fn test_disabled_feed_reports_disconnected() {
    let engine = nominal_engine();
    engine.tick(&SourceMode::Remote);

    assert!(engine.feed().is_none());
    assert_eq!(engine.feed_status(), FeedStatus::Disconnected);
    assert_eq!(engine.feed_stats().connection_attempts, 0);
}

// ============================================================================
// HISTORY + PUBLISHING
// ============================================================================

#[test]
fn test_history_grows_and_caps() {
    let mut config = offline_config();
    config.history_capacity = 3;
    let engine = TwinEngine::new(&config, LoadedModel::unavailable(), Arc::new(RemoteSampleState::new()));

    for current in [1.0, 2.0, 3.0, 4.0, 5.0] {
        engine.tick(&SourceMode::manual(200.0, current));
    }

    let frame = engine.publisher().latest().unwrap();
    assert_eq!(frame.history, vec![600.0, 800.0, 1000.0]);
    assert_eq!(engine.history().len(), 3);
    assert_eq!(frame.tick, 5);
    assert_eq!(engine.tick_count(), 5);
}

#[test]
fn test_frame_published_to_subscribers() {
    let engine = nominal_engine();
    let receiver = engine.publisher().subscribe();
    assert!(receiver.borrow().is_none());

    let frame = engine.tick(&SourceMode::scenario(Scenario::WireCut));

    let seen = receiver.borrow().clone().unwrap();
    assert_eq!(seen.tick, frame.tick);
    assert_eq!(seen.sample, frame.sample);
    assert_eq!(seen.source, SourceMode::scenario(Scenario::WireCut));
}

#[test]
fn test_frame_serializes() {
    let engine = nominal_engine();
    let frame = engine.tick(&SourceMode::manual(230.0, 5.0));

    let json = serde_json::to_value(&frame).unwrap();
    assert_eq!(json["source"]["mode"], "manual");
    assert_eq!(json["decision"]["verdict"], "SECURE");
    assert_eq!(json["metrics"]["power_watts"], 1150.0);
    assert_eq!(json["feed_status"], "disconnected");
}
