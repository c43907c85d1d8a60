//! Telemetry Source Adapter
//!
//! Normalizes the three input origins (manual controls, fault scenarios,
//! remote sensor feed) into a single `Sample`. Never fails: every mode
//! yields some sample.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sample::Sample;
use crate::constants::{MANUAL_CURRENT_MAX, MANUAL_VOLTAGE_MAX};
use crate::logic::feed::RemoteSampleState;

// ============================================================================
// SCENARIOS
// ============================================================================

/// Predefined fault-injection scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Normal,
    Theft,
    WireCut,
    Overload,
}

/// Scenario literals. Data, not logic.
pub const SCENARIO_TABLE: [(Scenario, Sample); 4] = [
    (Scenario::Normal, Sample::new(230.0, 5.0)),
    (Scenario::Theft, Sample::new(230.0, 0.2)),
    (Scenario::WireCut, Sample::new(10.0, 0.0)),
    (Scenario::Overload, Sample::new(210.0, 35.0)),
];

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Normal,
        Scenario::Theft,
        Scenario::WireCut,
        Scenario::Overload,
    ];

    /// Literal sample for this scenario
    pub fn sample(&self) -> Sample {
        SCENARIO_TABLE
            .iter()
            .find(|(scenario, _)| scenario == self)
            .map(|(_, sample)| *sample)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::Theft => "theft",
            Scenario::WireCut => "wire_cut",
            Scenario::Overload => "overload",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario: {0}")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    /// Accepts "WireCut", "wire_cut", "Wire Cut", "Theft (Bypass)", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .split('(')
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "normal" => Ok(Scenario::Normal),
            "theft" | "bypass" => Ok(Scenario::Theft),
            "wirecut" => Ok(Scenario::WireCut),
            "overload" => Ok(Scenario::Overload),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

// ============================================================================
// MANUAL CONTROLS
// ============================================================================

/// Operator-set values. Bounds are enforced here, by the input mechanism,
/// not by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManualControls {
    voltage: f64,
    current: f64,
}

impl ManualControls {
    pub fn new(voltage: f64, current: f64) -> Self {
        Self {
            voltage: clamp_input(voltage, MANUAL_VOLTAGE_MAX),
            current: clamp_input(current, MANUAL_CURRENT_MAX),
        }
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

impl Default for ManualControls {
    fn default() -> Self {
        let nominal = Sample::nominal();
        Self::new(nominal.voltage, nominal.current)
    }
}

fn clamp_input(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

// ============================================================================
// SOURCE MODE
// ============================================================================

/// Active data source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceMode {
    Manual(ManualControls),
    Scenario { scenario: Scenario },
    Remote,
}

impl SourceMode {
    pub fn manual(voltage: f64, current: f64) -> Self {
        SourceMode::Manual(ManualControls::new(voltage, current))
    }

    pub fn scenario(scenario: Scenario) -> Self {
        SourceMode::Scenario { scenario }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceMode::Remote)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceMode::Manual(_) => "manual",
            SourceMode::Scenario { .. } => "scenario",
            SourceMode::Remote => "remote",
        }
    }
}

impl Default for SourceMode {
    fn default() -> Self {
        SourceMode::Manual(ManualControls::default())
    }
}

/// Produce exactly one sample for the active mode.
///
/// Remote mode takes a snapshot of the shared state and never waits for a
/// fresh message.
pub fn read_sample(mode: &SourceMode, remote: &RemoteSampleState) -> Sample {
    match mode {
        SourceMode::Manual(controls) => Sample::new(controls.voltage(), controls.current()),
        SourceMode::Scenario { scenario } => scenario.sample(),
        SourceMode::Remote => remote.snapshot().sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_literals() {
        assert_eq!(Scenario::Normal.sample(), Sample::new(230.0, 5.0));
        assert_eq!(Scenario::Theft.sample(), Sample::new(230.0, 0.2));

        let wire_cut = Scenario::WireCut.sample();
        assert!(wire_cut.voltage <= 15.0);
        assert_eq!(wire_cut.current, 0.0);

        assert!(Scenario::Overload.sample().current >= 35.0);
    }

    #[test]
    fn test_scenario_table_covers_all() {
        for scenario in Scenario::ALL {
            assert!(SCENARIO_TABLE.iter().any(|(s, _)| *s == scenario));
        }
    }

    #[test]
    fn test_scenario_parse_display_names() {
        assert_eq!("Normal".parse::<Scenario>().unwrap(), Scenario::Normal);
        assert_eq!("Theft (Bypass)".parse::<Scenario>().unwrap(), Scenario::Theft);
        assert_eq!("Wire Cut".parse::<Scenario>().unwrap(), Scenario::WireCut);
        assert_eq!("wire_cut".parse::<Scenario>().unwrap(), Scenario::WireCut);
        assert_eq!("OVERLOAD".parse::<Scenario>().unwrap(), Scenario::Overload);
        assert!("blackout".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_manual_controls_clamped() {
        let controls = ManualControls::new(450.0, -3.0);
        assert_eq!(controls.voltage(), 300.0);
        assert_eq!(controls.current(), 0.0);

        let controls = ManualControls::new(f64::NAN, 25.0);
        assert_eq!(controls.voltage(), 0.0);
        assert_eq!(controls.current(), 20.0);
    }

    #[test]
    fn test_manual_values_verbatim() {
        let remote = RemoteSampleState::default();
        let sample = read_sample(&SourceMode::manual(231.5, 4.25), &remote);
        assert_eq!(sample, Sample::new(231.5, 4.25));
    }

    #[test]
    fn test_remote_defaults_before_first_message() {
        let remote = RemoteSampleState::default();
        let sample = read_sample(&SourceMode::Remote, &remote);
        assert_eq!(sample, Sample::new(230.0, 5.0));
    }

    #[test]
    fn test_read_sample_idempotent() {
        let remote = RemoteSampleState::default();
        remote.replace(Sample::new(228.0, 6.5));

        for mode in [
            SourceMode::Remote,
            SourceMode::manual(220.0, 3.0),
            SourceMode::scenario(Scenario::Theft),
        ] {
            assert_eq!(read_sample(&mode, &remote), read_sample(&mode, &remote));
        }
    }
}
