//! Joint angle calculation
//!
//! Angle at vertex B of the chain A-B-C, from the two vectors B→A and B→C.
//! Reflex angles are folded so the result is always the inner angle.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::pose::{Frame, Keypoint, CONFIDENCE_THRESHOLD};

/// Vectors shorter than this have no usable direction
const MIN_ARM_LENGTH: f32 = 1e-4;

/// A measured joint angle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    /// Inner angle in whole degrees, 0..=180
    pub degrees: f32,
    pub vertex: String,
}

/// Unrounded inner angle at `b` in degrees
///
/// Returns `None` when B coincides with A or C, since one of the arms has no
/// direction.
pub fn vertex_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    let v1 = Vector2::new(a.0 - b.0, a.1 - b.1);
    let v2 = Vector2::new(c.0 - b.0, c.1 - b.1);

    if v1.norm() < MIN_ARM_LENGTH || v2.norm() < MIN_ARM_LENGTH {
        return None;
    }

    let radians = v2.y.atan2(v2.x) - v1.y.atan2(v1.x);
    let mut degrees = radians.to_degrees().abs();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    Some(degrees)
}

/// Angle at `b` rounded to the nearest degree
///
/// `None` if any keypoint is below the confidence threshold.
pub fn angle(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> Option<f32> {
    let confident = [a, b, c]
        .iter()
        .all(|kp| kp.is_confident(CONFIDENCE_THRESHOLD));
    if !confident {
        return None;
    }
    vertex_angle(a.position(), b.position(), c.position()).map(f32::round)
}

/// Look up A, B, C by name in `frame` and measure the angle at B
pub fn measure_angle(frame: &Frame, a: &str, b: &str, c: &str) -> Option<AngleMeasurement> {
    let degrees = vertex_angle(frame.position(a)?, frame.position(b)?, frame.position(c)?)?;
    Some(AngleMeasurement {
        degrees: degrees.round(),
        vertex: b.to_string(),
    })
}
