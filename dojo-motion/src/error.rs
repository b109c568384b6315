//! Crate error type
//!
//! Only construction-time and lifecycle problems are errors. Per-frame data
//! gaps are `None` and detector trouble is reported as an event.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised by configuration builders, the session clock and the bridge
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("invalid thresholds for '{name}': {reason}")]
    InvalidThresholds { name: String, reason: String },

    #[error("cooldown must be a finite, non-negative number of milliseconds (got {0})")]
    InvalidCooldown(f64),

    #[error("target radius must be positive (got {0})")]
    InvalidRadius(f32),

    #[error("frame size must be positive (got {width}x{height})")]
    InvalidFrameSize { width: f32, height: f32 },

    #[error("blend factor must lie in [0, 1] (got {0})")]
    InvalidBlend(f32),

    #[error("hold challenge '{0}' has no stages")]
    MissingStages(String),

    #[error("signal or guard for '{0}' names no landmarks")]
    EmptyLandmarkSet(String),

    #[error("session clock can only start from idle (currently {0})")]
    ClockNotIdle(&'static str),

    #[error("session clock can only restart once complete (currently {0})")]
    ClockNotComplete(&'static str),

    #[error("no active session")]
    SessionNotActive,

    #[error("session was stopped")]
    SessionStopped,

    #[error("video source is already leased to another session")]
    SourceBusy,

    #[error("unknown technique '{0}'")]
    UnknownTechnique(String),

    #[error("could not decode input: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, MotionError>;

impl From<MotionError> for JsValue {
    fn from(err: MotionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        MotionError::Decode(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for MotionError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        MotionError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = MotionError::InvalidThresholds {
            name: "pushups".into(),
            reason: "enter_down (150) must be below enter_up (90)".into(),
        };
        assert!(err.to_string().contains("pushups"));
        assert!(err.to_string().contains("enter_down"));

        assert_eq!(
            MotionError::ClockNotIdle("active").to_string(),
            "session clock can only start from idle (currently active)"
        );
    }

    #[test]
    fn test_json_errors_become_decode() {
        let err: MotionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, MotionError::Decode(_)));
    }
}
