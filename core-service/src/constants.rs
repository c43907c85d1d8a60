//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden through the environment (see `TwinConfig::from_env`).

use std::str::FromStr;

// ============================================
// Remote feed (MQTT)
// ============================================

/// Default MQTT broker host
pub const DEFAULT_BROKER_HOST: &str = "broker.hivemq.com";

/// Default MQTT broker port
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Default topic carrying `{"voltage": .., "current": ..}` payloads
pub const DEFAULT_FEED_TOPIC: &str = "team_immortal/meter/data";

/// Default MQTT keep-alive (seconds)
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;

/// Prefix for the generated MQTT client id
pub const CLIENT_ID_PREFIX: &str = "meter-twin";

// ============================================
// Nominal grid point
// ============================================

/// Nominal grid voltage (V)
pub const NOMINAL_VOLTAGE: f64 = 230.0;

/// Nominal load current (A)
pub const NOMINAL_CURRENT: f64 = 5.0;

// ============================================
// Manual control bounds
// ============================================

pub const MANUAL_VOLTAGE_MAX: f64 = 300.0;
pub const MANUAL_CURRENT_MAX: f64 = 20.0;

// ============================================
// Billing & solar
// ============================================

/// Tariff in currency units per kWh
pub const DEFAULT_UNIT_RATE: f64 = 8.0;
pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Nominal rooftop generation (W)
pub const DEFAULT_SOLAR_GENERATION_W: f64 = 450.0;

/// Share of generation exported instead of self-consumed
pub const DEFAULT_SOLAR_EXPORT_RATIO: f64 = 0.65;

/// Inverter shuts down at or below this voltage
pub const DEFAULT_BROWNOUT_CUTOFF_V: f64 = 200.0;

// ============================================
// Engine cadence & history
// ============================================

/// Rolling history capacity (power readings)
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Remote mode refresh cadence (ms)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1_000;

// ============================================
// Model
// ============================================

/// Default persisted model artifact
pub const DEFAULT_MODEL_PATH: &str = "energy_model.onnx";

/// Expected share of outliers in the synthetic nominal set
pub const DEFAULT_CONTAMINATION: f64 = 0.05;

/// Size of the synthetic nominal training set
pub const DEFAULT_FALLBACK_SAMPLES: usize = 100;

/// Seed for the synthetic nominal training set
pub const DEFAULT_FALLBACK_SEED: u64 = 42;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Smart Meter Digital Twin";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Read and parse an environment variable, falling back to `default`
/// when it is unset or does not parse.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string environment variable or use default
pub fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an optional string environment variable (empty counts as unset)
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Boolean flag: anything except "false"/"0"/"off"/"no" enables
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key).map(|s| flag_value(&s)).unwrap_or(default)
}

/// Spellings that disable a flag, shared with the "off" switch of optional limits
pub fn is_off(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}

fn flag_value(raw: &str) -> bool {
    !is_off(raw)
}
