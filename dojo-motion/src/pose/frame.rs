//! Per-frame keypoint storage
//!
//! A `Frame` is what the engine reads each tick. It never mutates keypoints
//! and never extrapolates: a low-confidence keypoint is simply absent.

use serde::{Deserialize, Serialize};

use super::keypoint::{Keypoint, Pose, CONFIDENCE_THRESHOLD};

/// Keypoints of the tracked person plus the capture timestamp (ms)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: f64,
    pub keypoints: Vec<Keypoint>,
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f32,
}

fn default_threshold() -> f32 {
    CONFIDENCE_THRESHOLD
}

impl Frame {
    pub fn new(timestamp_ms: f64, keypoints: Vec<Keypoint>) -> Self {
        Self {
            timestamp_ms,
            keypoints,
            confidence_threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// A frame in which nothing was detected
    pub fn empty(timestamp_ms: f64) -> Self {
        Self::new(timestamp_ms, Vec::new())
    }

    /// Build a frame from a detector result. The pose with the best mean
    /// score is the tracked person (the earliest wins a tie); zero poses is
    /// a valid "nobody in view" frame.
    pub fn from_detections(timestamp_ms: f64, poses: Vec<Pose>) -> Self {
        let keypoints = poses
            .into_iter()
            .reduce(|best, pose| if pose.mean_score() > best.mean_score() { pose } else { best })
            .map(|pose| pose.keypoints)
            .unwrap_or_default();
        Self::new(timestamp_ms, keypoints)
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Keypoint by name, only if it clears the confidence threshold
    pub fn get(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|kp| kp.name == name)
            .filter(|kp| kp.is_confident(self.confidence_threshold))
    }

    pub fn position(&self, name: &str) -> Option<(f32, f32)> {
        self.get(name).map(Keypoint::position)
    }

    /// Whether every named keypoint is confidently present
    pub fn has_all(&self, names: &[String]) -> bool {
        names.iter().all(|name| self.get(name).is_some())
    }

    /// True when the detector returned no keypoints at all
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::keypoint::{LEFT_SHOULDER, NOSE, RIGHT_SHOULDER};

    fn frame() -> Frame {
        Frame::new(
            0.0,
            vec![
                Keypoint::new(NOSE, 100.0, 50.0, 0.9),
                Keypoint::new(LEFT_SHOULDER, 80.0, 120.0, 0.1),
            ],
        )
    }

    #[test]
    fn test_low_confidence_keypoint_is_absent() {
        let f = frame();
        assert!(f.get(NOSE).is_some());
        assert!(f.get(LEFT_SHOULDER).is_none());
        assert!(f.get(RIGHT_SHOULDER).is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let f = frame().with_threshold(0.05);
        assert_eq!(f.position(LEFT_SHOULDER), Some((80.0, 120.0)));
    }

    #[test]
    fn test_from_detections_tracks_best_scoring_pose() {
        let faint = Pose::new(vec![Keypoint::new(NOSE, 1.0, 2.0, 0.4)]);
        let clear = Pose::new(vec![Keypoint::new(NOSE, 9.0, 9.0, 0.9)]);
        let f = Frame::from_detections(10.0, vec![faint, clear]);
        assert_eq!(f.position(NOSE), Some((9.0, 9.0)));

        let first = Pose::new(vec![Keypoint::new(NOSE, 1.0, 2.0, 0.8)]);
        let second = Pose::new(vec![Keypoint::new(NOSE, 9.0, 9.0, 0.8)]);
        let tie = Frame::from_detections(10.0, vec![first, second]);
        assert_eq!(tie.position(NOSE), Some((1.0, 2.0)));

        let nobody = Frame::from_detections(11.0, Vec::new());
        assert!(nobody.is_empty());
        assert!(nobody.get(NOSE).is_none());
    }

    #[test]
    fn test_has_all() {
        let f = frame();
        assert!(f.has_all(&[NOSE.to_string()]));
        assert!(!f.has_all(&[NOSE.to_string(), LEFT_SHOULDER.to_string()]));
    }
}
