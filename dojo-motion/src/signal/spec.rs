//! Motion signal extraction
//!
//! A `SignalSpec` turns one frame into one scalar (or nothing). Exercises
//! differ only in which spec they use, not in how they are counted.

use serde::{Deserialize, Serialize};

use crate::geometry::{midpoint, vertex_angle};
use crate::pose::Frame;

/// Three landmark names forming a joint chain, vertex in the middle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub a: String,
    pub b: String,
    pub c: String,
}

impl Chain {
    pub fn new(a: &str, b: &str, c: &str) -> Self {
        Self {
            a: a.to_string(),
            b: b.to_string(),
            c: c.to_string(),
        }
    }

    fn names(&self) -> [&str; 3] {
        [&self.a, &self.b, &self.c]
    }
}

/// A left/right landmark pair, read as its midpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub left: String,
    pub right: String,
}

impl Pair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    fn center(&self, frame: &Frame) -> Option<(f32, f32)> {
        Some(midpoint(frame.position(&self.left)?, frame.position(&self.right)?))
    }
}

/// How a motion signal is derived from a frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalSpec {
    /// Angle at the middle landmark, whole degrees
    JointAngle(Chain),
    /// Mean of two joint angles; undefined unless both are measurable
    MeanJointAngle { left: Chain, right: Chain },
    /// Angle between the midpoints of three left/right pairs
    MidpointAngle { a: Pair, b: Pair, c: Pair },
    /// `line.y - point.y` in pixels; shrinks as the point drops to the line
    VerticalGap { point: String, line: Pair },
    /// `(upper.y - lower.y) / upper.y`, height of `lower` relative to `upper`
    HeightRatio { upper: String, lower: String },
}

impl SignalSpec {
    /// Evaluate against a frame; `None` whenever an input is absent
    pub fn evaluate(&self, frame: &Frame) -> Option<f32> {
        match self {
            SignalSpec::JointAngle(chain) => chain_angle(frame, chain),
            SignalSpec::MeanJointAngle { left, right } => {
                let l = chain_angle(frame, left)?;
                let r = chain_angle(frame, right)?;
                Some((l + r) / 2.0)
            }
            SignalSpec::MidpointAngle { a, b, c } => {
                vertex_angle(a.center(frame)?, b.center(frame)?, c.center(frame)?).map(f32::round)
            }
            SignalSpec::VerticalGap { point, line } => {
                let (_, py) = frame.position(point)?;
                let (_, ly) = line.center(frame)?;
                Some(ly - py)
            }
            SignalSpec::HeightRatio { upper, lower } => {
                let (_, uy) = frame.position(upper)?;
                let (_, ly) = frame.position(lower)?;
                if uy.abs() < f32::EPSILON {
                    return None;
                }
                Some((uy - ly) / uy)
            }
        }
    }

    /// Every landmark the signal reads
    pub fn landmarks(&self) -> Vec<&str> {
        match self {
            SignalSpec::JointAngle(chain) => chain.names().to_vec(),
            SignalSpec::MeanJointAngle { left, right } => {
                left.names().into_iter().chain(right.names()).collect()
            }
            SignalSpec::MidpointAngle { a, b, c } => [a, b, c]
                .into_iter()
                .flat_map(|p| [p.left.as_str(), p.right.as_str()])
                .collect(),
            SignalSpec::VerticalGap { point, line } => {
                vec![point.as_str(), line.left.as_str(), line.right.as_str()]
            }
            SignalSpec::HeightRatio { upper, lower } => vec![upper.as_str(), lower.as_str()],
        }
    }
}

fn chain_angle(frame: &Frame, chain: &Chain) -> Option<f32> {
    vertex_angle(
        frame.position(&chain.a)?,
        frame.position(&chain.b)?,
        frame.position(&chain.c)?,
    )
    .map(f32::round)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::*;

    fn kp(name: &str, x: f32, y: f32) -> Keypoint {
        Keypoint::new(name, x, y, 0.9)
    }

    fn arms(left_wrist: (f32, f32), right_wrist: (f32, f32)) -> Frame {
        Frame::new(
            0.0,
            vec![
                kp(LEFT_SHOULDER, 0.0, 0.0),
                kp(LEFT_ELBOW, 0.0, 100.0),
                kp(LEFT_WRIST, left_wrist.0, left_wrist.1),
                kp(RIGHT_SHOULDER, 200.0, 0.0),
                kp(RIGHT_ELBOW, 200.0, 100.0),
                kp(RIGHT_WRIST, right_wrist.0, right_wrist.1),
            ],
        )
    }

    #[test]
    fn test_joint_angle() {
        let spec = SignalSpec::JointAngle(Chain::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST));
        assert_eq!(spec.evaluate(&arms((0.0, 200.0), (200.0, 200.0))), Some(180.0));
        assert_eq!(spec.evaluate(&arms((100.0, 100.0), (200.0, 200.0))), Some(90.0));
    }

    #[test]
    fn test_mean_joint_angle_needs_both_sides() {
        let spec = SignalSpec::MeanJointAngle {
            left: Chain::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            right: Chain::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
        };
        // left straight (180), right bent (90)
        assert_eq!(spec.evaluate(&arms((0.0, 200.0), (300.0, 100.0))), Some(135.0));

        let mut one_sided = arms((0.0, 200.0), (300.0, 100.0));
        one_sided.keypoints.retain(|kp| kp.name != RIGHT_WRIST);
        assert_eq!(spec.evaluate(&one_sided), None);
    }

    #[test]
    fn test_midpoint_angle() {
        let frame = Frame::new(
            0.0,
            vec![
                kp(LEFT_SHOULDER, 0.0, 0.0),
                kp(RIGHT_SHOULDER, 0.0, 20.0),
                kp(LEFT_HIP, 100.0, 0.0),
                kp(RIGHT_HIP, 100.0, 20.0),
                kp(LEFT_KNEE, 100.0, 110.0),
                kp(RIGHT_KNEE, 100.0, 110.0),
            ],
        );
        let spec = SignalSpec::MidpointAngle {
            a: Pair::new(LEFT_SHOULDER, RIGHT_SHOULDER),
            b: Pair::new(LEFT_HIP, RIGHT_HIP),
            c: Pair::new(LEFT_KNEE, RIGHT_KNEE),
        };
        assert_eq!(spec.evaluate(&frame), Some(90.0));
    }

    #[test]
    fn test_vertical_gap() {
        let frame = Frame::new(
            0.0,
            vec![
                kp(NOSE, 100.0, 150.0),
                kp(LEFT_SHOULDER, 60.0, 240.0),
                kp(RIGHT_SHOULDER, 140.0, 260.0),
            ],
        );
        let spec = SignalSpec::VerticalGap {
            point: NOSE.into(),
            line: Pair::new(LEFT_SHOULDER, RIGHT_SHOULDER),
        };
        assert_eq!(spec.evaluate(&frame), Some(100.0));
    }

    #[test]
    fn test_height_ratio() {
        let frame = Frame::new(0.0, vec![kp(RIGHT_HIP, 50.0, 400.0), kp(RIGHT_ANKLE, 300.0, 100.0)]);
        let spec = SignalSpec::HeightRatio {
            upper: RIGHT_HIP.into(),
            lower: RIGHT_ANKLE.into(),
        };
        assert_eq!(spec.evaluate(&frame), Some(0.75));
    }

    #[test]
    fn test_landmarks_listed() {
        let spec = SignalSpec::MidpointAngle {
            a: Pair::new(LEFT_SHOULDER, RIGHT_SHOULDER),
            b: Pair::new(LEFT_HIP, RIGHT_HIP),
            c: Pair::new(LEFT_KNEE, RIGHT_KNEE),
        };
        assert_eq!(spec.landmarks().len(), 6);
        assert!(spec.landmarks().contains(&RIGHT_KNEE));
    }

    #[test]
    fn test_serde_tagged_form() {
        let json = r#"{"kind":"joint_angle","a":"left_hip","b":"left_knee","c":"left_ankle"}"#;
        let spec: SignalSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, SignalSpec::JointAngle(Chain::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE)));
    }
}
