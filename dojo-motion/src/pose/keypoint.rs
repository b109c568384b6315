//! Keypoint data contract produced by the external pose model
//!
//! Names follow the MoveNet/COCO 17-point convention. Coordinates are in
//! frame pixel space, `y` grows downward.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK NAMES (MoveNet - 17 total)
// ============================================================================

pub const NOSE: &str = "nose";
pub const LEFT_EYE: &str = "left_eye";
pub const RIGHT_EYE: &str = "right_eye";
pub const LEFT_EAR: &str = "left_ear";
pub const RIGHT_EAR: &str = "right_ear";
pub const LEFT_SHOULDER: &str = "left_shoulder";
pub const RIGHT_SHOULDER: &str = "right_shoulder";
pub const LEFT_ELBOW: &str = "left_elbow";
pub const RIGHT_ELBOW: &str = "right_elbow";
pub const LEFT_WRIST: &str = "left_wrist";
pub const RIGHT_WRIST: &str = "right_wrist";
pub const LEFT_HIP: &str = "left_hip";
pub const RIGHT_HIP: &str = "right_hip";
pub const LEFT_KNEE: &str = "left_knee";
pub const RIGHT_KNEE: &str = "right_knee";
pub const LEFT_ANKLE: &str = "left_ankle";
pub const RIGHT_ANKLE: &str = "right_ankle";

/// Keypoints scored below this are treated as absent for the frame
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// A single named, scored 2-D landmark estimate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Model confidence in [0, 1]; a missing score is read as 0
    #[serde(default)]
    pub score: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }

    /// Whether this keypoint clears `threshold` and has usable coordinates
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.score >= threshold && self.x.is_finite() && self.y.is_finite()
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// One detected person: the keypoints the model returned for them
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Mean score over all keypoints, 0 for an empty pose
    pub fn mean_score(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        self.keypoints.iter().map(|kp| kp.score).sum::<f32>() / self.keypoints.len() as f32
    }
}
