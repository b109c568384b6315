//! Instantaneous velocity of a tracked point
//!
//! The previous sample is explicit state threaded through each call rather
//! than hidden in the caller. Losing the point drops the previous sample, so
//! a jump across a detection gap never reads as fast movement.

use serde::{Deserialize, Serialize};

use super::points::distance_between;

/// A position observed at a moment in time (ms)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSample {
    pub x: f32,
    pub y: f32,
    pub time_ms: f64,
}

impl PointSample {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self { x, y, time_ms }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Speed in px/ms between two samples
///
/// `None` without a previous sample or when time did not advance.
pub fn velocity(prev: Option<&PointSample>, curr: &PointSample) -> Option<f32> {
    let prev = prev?;
    let dt = curr.time_ms - prev.time_ms;
    if dt <= 0.0 {
        return None;
    }
    Some(distance_between(prev.position(), curr.position()) / dt as f32)
}

/// Tracking state for one point (e.g. one wrist)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointTrack {
    pub last: Option<PointSample>,
}

impl PointTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance with this frame's observation
    ///
    /// Returns the next state and the velocity for this frame. An absent
    /// observation invalidates the previous sample.
    pub fn step(self, observed: Option<(f32, f32)>, time_ms: f64) -> (Self, Option<f32>) {
        match observed {
            Some((x, y)) => {
                let sample = PointSample::new(x, y, time_ms);
                let speed = velocity(self.last.as_ref(), &sample);
                (Self { last: Some(sample) }, speed)
            }
            None => (Self { last: None }, None),
        }
    }
}
