//! Pose module - keypoint data contract with the external detector
//!
//! Re-exports only. All logic in submodules.

mod frame;
mod keypoint;

pub use frame::Frame;
pub use keypoint::{
    Keypoint, Pose, CONFIDENCE_THRESHOLD,
    // Landmark names
    NOSE, LEFT_EYE, RIGHT_EYE, LEFT_EAR, RIGHT_EAR,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
