//! Feed Payload Parsing
//!
//! Payloads are UTF-8 JSON objects `{"voltage": <number>, "current": <number>}`.
//! Numeric strings are accepted as numbers. Anything else is malformed.

use serde::Deserialize;

use super::FeedError;
use crate::logic::telemetry::Sample;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reading {
    Number(f64),
    Text(String),
}

impl Reading {
    fn value(&self, field: &'static str) -> Result<f64, FeedError> {
        let value = match self {
            Reading::Number(v) => *v,
            Reading::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FeedError::InvalidField(field))?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(FeedError::InvalidField(field))
        }
    }
}

#[derive(Debug, Deserialize)]
struct TelemetryPayload {
    voltage: Reading,
    current: Reading,
}

/// Parse one feed message into a sample
pub fn parse_payload(payload: &[u8]) -> Result<Sample, FeedError> {
    let text = std::str::from_utf8(payload).map_err(|_| FeedError::NotUtf8)?;
    let parsed: TelemetryPayload = serde_json::from_str(text)?;

    Ok(Sample::new(
        parsed.voltage.value("voltage")?,
        parsed.current.value("current")?,
    ))
}
