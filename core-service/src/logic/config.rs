//! Twin Configuration
//!
//! Assembled from environment variables (optionally via `.env`) with
//! defaults from `constants.rs`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{self, env_flag, env_opt, env_or, env_string};
use crate::logic::metrics::{BillingConfig, WaveformConfig};
use crate::logic::threat::DecisionThresholds;

// ============================================================================
// FEED
// ============================================================================

/// Remote feed (MQTT) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Enable the remote feed
    pub enabled: bool,
    pub broker_host: String,
    pub broker_port: u16,
    pub topic: String,
    pub keep_alive_secs: u64,
    pub client_id_prefix: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            broker_host: constants::DEFAULT_BROKER_HOST.to_string(),
            broker_port: constants::DEFAULT_BROKER_PORT,
            topic: constants::DEFAULT_FEED_TOPIC.to_string(),
            keep_alive_secs: constants::DEFAULT_KEEP_ALIVE_SECS,
            client_id_prefix: constants::CLIENT_ID_PREFIX.to_string(),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("TWIN_FEED_ENABLED", defaults.enabled),
            broker_host: env_string("TWIN_BROKER_HOST", &defaults.broker_host),
            broker_port: env_or("TWIN_BROKER_PORT", defaults.broker_port),
            topic: env_string("TWIN_FEED_TOPIC", &defaults.topic),
            keep_alive_secs: env_or("TWIN_KEEP_ALIVE_SECS", defaults.keep_alive_secs),
            client_id_prefix: defaults.client_id_prefix,
        }
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Outlier model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Persisted artifact (`.onnx` or `.json`)
    pub path: Option<PathBuf>,
    /// Expected SHA-256 (hex) of the artifact, verified before loading
    pub expected_sha256: Option<String>,
    /// Name of the label output of an ONNX artifact (first output if unset)
    pub onnx_label_output: Option<String>,
    /// Train the nominal fallback model when no artifact can be loaded
    pub train_fallback: bool,
    pub contamination: f64,
    pub fallback_samples: usize,
    pub fallback_seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(constants::DEFAULT_MODEL_PATH)),
            expected_sha256: None,
            onnx_label_output: None,
            train_fallback: true,
            contamination: constants::DEFAULT_CONTAMINATION,
            fallback_samples: constants::DEFAULT_FALLBACK_SAMPLES,
            fallback_seed: constants::DEFAULT_FALLBACK_SEED,
        }
    }
}

impl ModelConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            path: env_opt("TWIN_MODEL_PATH").map(PathBuf::from).or(defaults.path),
            expected_sha256: env_opt("TWIN_MODEL_SHA256"),
            onnx_label_output: env_opt("TWIN_MODEL_LABEL_OUTPUT"),
            train_fallback: env_flag("TWIN_MODEL_TRAIN_FALLBACK", defaults.train_fallback),
            contamination: env_or("TWIN_MODEL_CONTAMINATION", defaults.contamination),
            fallback_samples: env_or("TWIN_MODEL_FALLBACK_SAMPLES", defaults.fallback_samples),
            fallback_seed: env_or("TWIN_MODEL_FALLBACK_SEED", defaults.fallback_seed),
        }
    }
}

// ============================================================================
// TWIN
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error("refresh interval must be at least 1ms")]
    ZeroRefreshInterval,

    #[error("low voltage threshold {low}V must be below high threshold {high}V")]
    InvertedVoltageBand { low: f64, high: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinConfig {
    pub feed: FeedConfig,
    pub model: ModelConfig,
    pub thresholds: DecisionThresholds,
    pub billing: BillingConfig,
    pub waveform: WaveformConfig,
    pub history_capacity: usize,
    pub refresh_interval_ms: u64,
}

impl TwinConfig {
    /// Load from environment with fallback to defaults
    pub fn from_env() -> Self {
        let thresholds = DecisionThresholds::default();
        let billing = BillingConfig::default();

        Self {
            feed: FeedConfig::from_env(),
            model: ModelConfig::from_env(),
            thresholds: DecisionThresholds {
                low_voltage: env_or("TWIN_LOW_VOLTAGE", thresholds.low_voltage),
                high_voltage: env_or("TWIN_HIGH_VOLTAGE", thresholds.high_voltage),
                overload_current: match env_opt("TWIN_OVERLOAD_CURRENT") {
                    Some(raw) if constants::is_off(&raw) => None,
                    Some(raw) => raw.trim().parse().ok().or(thresholds.overload_current),
                    None => thresholds.overload_current,
                },
            },
            billing: BillingConfig {
                unit_rate: env_or("TWIN_UNIT_RATE", billing.unit_rate),
                solar_generation_w: env_or("TWIN_SOLAR_GENERATION_W", billing.solar_generation_w),
                solar_export_ratio: env_or("TWIN_SOLAR_EXPORT_RATIO", billing.solar_export_ratio),
                ..billing
            },
            waveform: WaveformConfig::default(),
            history_capacity: env_or("TWIN_HISTORY_CAPACITY", constants::DEFAULT_HISTORY_CAPACITY),
            refresh_interval_ms: env_or("TWIN_REFRESH_INTERVAL_MS", constants::DEFAULT_REFRESH_INTERVAL_MS),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.thresholds.low_voltage >= self.thresholds.high_voltage {
            return Err(ConfigError::InvertedVoltageBand {
                low: self.thresholds.low_voltage,
                high: self.thresholds.high_voltage,
            });
        }

        check_range("solar_export_ratio", self.billing.solar_export_ratio, 0.0, 1.0)?;
        check_range("unit_rate", self.billing.unit_rate, 0.0, f64::MAX)?;
        check_range("model.contamination", self.model.contamination, 0.0, 0.5)?;

        Ok(())
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            model: ModelConfig::default(),
            thresholds: DecisionThresholds::default(),
            billing: BillingConfig::default(),
            waveform: WaveformConfig::default(),
            history_capacity: constants::DEFAULT_HISTORY_CAPACITY,
            refresh_interval_ms: constants::DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TwinConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_capacity, 60);
        assert_eq!(config.refresh_interval_ms, 1_000);
        assert_eq!(config.feed.topic, "team_immortal/meter/data");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = TwinConfig {
            history_capacity: 0,
            ..TwinConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroHistoryCapacity));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = TwinConfig::default();
        config.thresholds.low_voltage = 260.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedVoltageBand { .. })
        ));
    }

    #[test]
    fn test_export_ratio_range() {
        let mut config = TwinConfig::default();
        config.billing.solar_export_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "solar_export_ratio", .. })
        ));
    }
}
