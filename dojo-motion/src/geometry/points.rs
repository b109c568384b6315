//! Distances and midpoints in pixel space

use nalgebra::Vector2;

use crate::pose::Keypoint;
use crate::pose::CONFIDENCE_THRESHOLD;

/// Euclidean distance between two positions
pub fn distance_between(p: (f32, f32), q: (f32, f32)) -> f32 {
    (Vector2::new(q.0, q.1) - Vector2::new(p.0, p.1)).norm()
}

/// Distance between two keypoints, `None` if either is low-confidence
pub fn distance(p: &Keypoint, q: &Keypoint) -> Option<f32> {
    if !p.is_confident(CONFIDENCE_THRESHOLD) || !q.is_confident(CONFIDENCE_THRESHOLD) {
        return None;
    }
    Some(distance_between(p.position(), q.position()))
}

pub fn midpoint(p: (f32, f32), q: (f32, f32)) -> (f32, f32) {
    ((p.0 + q.0) / 2.0, (p.1 + q.1) / 2.0)
}

/// Squared distance, for radius tests without a square root
pub fn distance_squared(p: (f32, f32), q: (f32, f32)) -> f32 {
    (Vector2::new(q.0, q.1) - Vector2::new(p.0, p.1)).norm_squared()
}
