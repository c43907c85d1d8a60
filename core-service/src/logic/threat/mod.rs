//! Threat Module
//!
//! Decides SECURE / ALERT for a sample by fusing the outlier model with
//! hard voltage/current limits. This is the core step of every tick.
//!
//! ## Structure
//! - `types`: Verdict, AnomalyLabel, DecisionRecord
//! - `rules`: Thresholds and score constants
//! - `classifier`: Decision logic + DecisionEngine
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{DecisionEngine, DecisionThresholds, Verdict};
//!
//! let engine = DecisionEngine::new(model::load(&config.model), DecisionThresholds::default());
//! match engine.evaluate(&sample).verdict() {
//!     Verdict::Secure => println!("SAFE"),
//!     Verdict::Alert => println!("THEFT!"),
//! }
//! ```

pub mod classifier;
pub mod rules;
pub mod types;

pub use types::{AnomalyLabel, DecisionRecord, Verdict};

pub use rules::{
    DecisionThresholds,
    ALERT_HEALTH_INDEX,
    ALERT_THEFT_PROBABILITY,
    HIGH_VOLTAGE_THRESHOLD,
    LOW_VOLTAGE_THRESHOLD,
    OVERLOAD_CURRENT_THRESHOLD,
};

pub use classifier::{decide, DecisionEngine};
