//! Control Commands
//!
//! Text form of the control panel, one command per line:
//!
//! ```text
//! manual <voltage> <current>
//! scenario <normal|theft|wire cut|overload>
//! remote
//! refresh
//! ```

use std::str::FromStr;

use crate::logic::telemetry::{Scenario, SourceMode, UnknownScenario};

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Switch source and tick immediately
    SetMode(SourceMode),
    /// Tick again with the current source
    Refresh,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: manual <voltage> <current>")]
    ManualUsage,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error(transparent)]
    Scenario(#[from] UnknownScenario),
}

impl FromStr for ControlCommand {
    type Err = ControlParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().ok_or(ControlParseError::Empty)?.to_ascii_lowercase();

        match command.as_str() {
            "manual" => {
                let args: Vec<&str> = parts.collect();
                let [voltage, current] = args.as_slice() else {
                    return Err(ControlParseError::ManualUsage);
                };
                Ok(ControlCommand::SetMode(SourceMode::manual(
                    parse_number(voltage)?,
                    parse_number(current)?,
                )))
            }
            "scenario" | "demo" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let scenario: Scenario = name.parse()?;
                Ok(ControlCommand::SetMode(SourceMode::scenario(scenario)))
            }
            "remote" | "live" => Ok(ControlCommand::SetMode(SourceMode::Remote)),
            "refresh" => Ok(ControlCommand::Refresh),
            other => Err(ControlParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_number(raw: &str) -> Result<f64, ControlParseError> {
    raw.parse()
        .map_err(|_| ControlParseError::NotANumber(raw.to_string()))
}
