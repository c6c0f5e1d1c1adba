//! Status events emitted by `check --json`.
//!
//! Each stdout line of the check command is one JSON object of the form
//! `{"type": "...", "data": ...}`. [`classify`] turns a single line into an
//! [`Event`]; [`decode`] adapts a line iterator into an event iterator.
//!
//! Decode failures are returned as [`DecodeError`] values so the consumer
//! decides whether to abort or skip.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::CheckError;

/// Data attached to an error, warning, or success event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Structured(Value),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

/// A classified status event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Error(Payload),
    Warning(Payload),
    Success(Payload),
    /// Progress notification naming the package being checked.
    ActivityTick(String),
}

/// A line that is not a valid status event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub line: String,
    pub message: String,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.line)
    }
}

impl From<DecodeError> for CheckError {
    fn from(err: DecodeError) -> Self {
        CheckError::EventDecode {
            line: err.line,
            message: err.message,
        }
    }
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    data: Value,
}

/// Classify one line of check output.
///
/// Returns `Ok(None)` for blank lines and for event types that carry no
/// status (e.g. `info`, `step`).
pub fn classify(line: &str) -> Result<Option<Event>, DecodeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let raw: RawEvent = serde_json::from_str(trimmed).map_err(|e| DecodeError {
        line: trimmed.to_string(),
        message: e.to_string(),
    })?;

    let event = match raw.kind.as_str() {
        "error" => Event::Error(payload(raw.data)),
        "warning" => Event::Warning(payload(raw.data)),
        "success" => Event::Success(payload(raw.data)),
        "activityTick" => match raw.data.get("name").and_then(Value::as_str) {
            Some(name) => Event::ActivityTick(name.to_string()),
            None => {
                return Err(DecodeError {
                    line: trimmed.to_string(),
                    message: "activityTick without a name".to_string(),
                })
            }
        },
        other => {
            tracing::trace!("Ignoring '{}' event", other);
            return Ok(None);
        }
    };

    Ok(Some(event))
}

fn payload(data: Value) -> Payload {
    match data {
        Value::String(text) => Payload::Text(text),
        other => Payload::Structured(other),
    }
}

/// Lazily classify a sequence of lines.
///
/// Lines without a status event are filtered out; decode failures are
/// yielded in place.
pub fn decode<I>(lines: I) -> impl Iterator<Item = Result<Event, DecodeError>>
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .filter_map(|line| classify(&line).transpose())
}
