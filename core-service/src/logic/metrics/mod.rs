//! Metric Deriver
//!
//! Pure functions from a sample to power, billing and solar export figures.
//!
//! ## Structure
//! - `mod.rs` - MetricsRecord + `derive`
//! - `waveform.rs` - Oscilloscope trace for the presentation layer

pub mod waveform;

pub use waveform::{synthesize, WaveformConfig, WaveformPoint};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::telemetry::Sample;

/// Billing and solar constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Currency units per kWh
    pub unit_rate: f64,
    pub hours_per_day: f64,
    pub days_per_month: f64,
    /// Nominal rooftop generation (W)
    pub solar_generation_w: f64,
    /// Fraction of generation exported
    pub solar_export_ratio: f64,
    /// Inverter shutdown at or below this voltage
    pub brownout_cutoff_v: f64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            unit_rate: constants::DEFAULT_UNIT_RATE,
            hours_per_day: constants::HOURS_PER_DAY,
            days_per_month: constants::DAYS_PER_MONTH,
            solar_generation_w: constants::DEFAULT_SOLAR_GENERATION_W,
            solar_export_ratio: constants::DEFAULT_SOLAR_EXPORT_RATIO,
            brownout_cutoff_v: constants::DEFAULT_BROWNOUT_CUTOFF_V,
        }
    }
}

/// Derived electrical metrics for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub power_watts: f64,
    pub estimated_monthly_cost: f64,
    pub solar_export_watts: f64,
    /// Deviation from nominal 230V
    pub voltage_delta: f64,
    /// Deviation from nominal 5A
    pub current_delta: f64,
}

/// Derive metrics. Total: every finite sample yields a record.
pub fn derive(sample: &Sample, billing: &BillingConfig) -> MetricsRecord {
    let power_watts = sample.voltage * sample.current;

    let estimated_monthly_cost = (power_watts / 1000.0)
        * billing.unit_rate
        * billing.hours_per_day
        * billing.days_per_month;

    let generation = if sample.voltage <= billing.brownout_cutoff_v {
        0.0
    } else {
        billing.solar_generation_w
    };

    MetricsRecord {
        power_watts,
        estimated_monthly_cost,
        solar_export_watts: generation * billing.solar_export_ratio,
        voltage_delta: sample.voltage - constants::NOMINAL_VOLTAGE,
        current_delta: sample.current - constants::NOMINAL_CURRENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_power_is_product() {
        let billing = BillingConfig::default();
        for (v, c) in [(230.0, 5.0), (15.0, 0.0), (220.0, 35.0), (231.7, 3.3), (0.0, 20.0)] {
            let metrics = derive(&Sample::new(v, c), &billing);
            assert!((metrics.power_watts - v * c).abs() < EPS);
        }
    }

    #[test]
    fn test_monthly_cost() {
        let metrics = derive(&Sample::new(230.0, 5.0), &BillingConfig::default());
        // 1.15 kW * 8 * 24h * 30d
        assert!((metrics.estimated_monthly_cost - 6624.0).abs() < 1e-6);
    }

    #[test]
    fn test_solar_export_gated_by_brownout() {
        let billing = BillingConfig::default();

        let healthy = derive(&Sample::new(230.0, 5.0), &billing);
        assert!((healthy.solar_export_watts - 450.0 * 0.65).abs() < EPS);

        let at_cutoff = derive(&Sample::new(200.0, 5.0), &billing);
        assert_eq!(at_cutoff.solar_export_watts, 0.0);

        let brownout = derive(&Sample::new(150.0, 5.0), &billing);
        assert_eq!(brownout.solar_export_watts, 0.0);
    }

    #[test]
    fn test_nominal_deltas() {
        let metrics = derive(&Sample::new(210.0, 35.0), &BillingConfig::default());
        assert!((metrics.voltage_delta + 20.0).abs() < EPS);
        assert!((metrics.current_delta - 30.0).abs() < EPS);
    }
}
