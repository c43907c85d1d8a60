//! Telemetry Sample
//!
//! One voltage/current reading. Lives for a single tick.

use serde::{Deserialize, Serialize};

use crate::constants::{NOMINAL_CURRENT, NOMINAL_VOLTAGE};

/// Number of features fed to the outlier model: `[voltage, current]`
pub const FEATURE_COUNT: usize = 2;

/// Feature vector layout expected by every outlier model
pub type FeatureVector = [f64; FEATURE_COUNT];

/// One voltage/current reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Grid voltage (V)
    pub voltage: f64,
    /// Load current (A)
    pub current: f64,
}

impl Sample {
    pub const fn new(voltage: f64, current: f64) -> Self {
        Self { voltage, current }
    }

    /// Nominal grid point, 230V / 5A
    pub const fn nominal() -> Self {
        Self::new(NOMINAL_VOLTAGE, NOMINAL_CURRENT)
    }

    pub fn features(&self) -> FeatureVector {
        [self.voltage, self.current]
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::nominal()
    }
}
