//! Oscilloscope trace: `v(t) = V * sin(2π f t)` sampled over a short window.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformConfig {
    pub frequency_hz: f64,
    pub window_secs: f64,
    pub points: usize,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 50.0,
            window_secs: 0.1,
            points: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformPoint {
    pub time: f64,
    pub voltage: f64,
}

/// Evenly spaced points from 0 to `window_secs` inclusive.
pub fn synthesize(amplitude: f64, config: &WaveformConfig) -> Vec<WaveformPoint> {
    let step = match config.points {
        0 => return Vec::new(),
        1 => 0.0,
        n => config.window_secs / (n - 1) as f64,
    };

    (0..config.points)
        .map(|i| {
            let time = i as f64 * step;
            WaveformPoint {
                time,
                voltage: amplitude * (2.0 * PI * config.frequency_hz * time).sin(),
            }
        })
        .collect()
}
