//! Static martial-arts technique poses
//!
//! Each technique is a predicate over a single frame, built from limb angles
//! plus pixel offsets between landmarks (`y` grows downward). A technique
//! whose landmarks are absent never matches.

use serde::{Deserialize, Serialize};

use crate::geometry::vertex_angle;
use crate::pose::*;

/// Elbow angle at or above which an arm reads as a straight punch
pub const STRAIGHT_ARM_DEGREES: f32 = 160.0;

/// Knee angle at or above which a leg reads as extended
pub const STRAIGHT_LEG_DEGREES: f32 = 150.0;

/// Knee angle at or below which a stance leg reads as bent
pub const BENT_KNEE_DEGREES: f32 = 160.0;

const LEFT_ARM: [&str; 3] = [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST];
const RIGHT_ARM: [&str; 3] = [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST];
const LEFT_LEG: [&str; 3] = [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE];
const RIGHT_LEG: [&str; 3] = [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE];

// Image-space direction each limb reaches when striking
const LEFT_PUNCH_DIR: f32 = 1.0;
const RIGHT_PUNCH_DIR: f32 = -1.0;
const LEFT_KICK_DIR: f32 = -1.0;
const RIGHT_KICK_DIR: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    LeftPunch,
    RightPunch,
    LeftKick,
    RightKick,
    /// Either leg kicking forward
    FrontKick,
    SideKick,
    /// Read the same as a side kick from a single 2-D frame
    RoundKick,
    HorseStance,
    HighBlock,
    LowBlock,
}

/// Checked in this order by `recognize`; composites (front and round kick)
/// are left out in favour of the specific technique
const RECOGNITION_ORDER: [Technique; 8] = [
    Technique::HorseStance,
    Technique::HighBlock,
    Technique::LeftKick,
    Technique::RightKick,
    Technique::SideKick,
    Technique::LeftPunch,
    Technique::RightPunch,
    Technique::LowBlock,
];

impl Technique {
    pub const ALL: [Technique; 10] = [
        Technique::LeftPunch,
        Technique::RightPunch,
        Technique::LeftKick,
        Technique::RightKick,
        Technique::FrontKick,
        Technique::SideKick,
        Technique::RoundKick,
        Technique::HorseStance,
        Technique::HighBlock,
        Technique::LowBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::LeftPunch => "left_punch",
            Technique::RightPunch => "right_punch",
            Technique::LeftKick => "left_kick",
            Technique::RightKick => "right_kick",
            Technique::FrontKick => "front_kick",
            Technique::SideKick => "side_kick",
            Technique::RoundKick => "round_kick",
            Technique::HorseStance => "horse_stance",
            Technique::HighBlock => "high_block",
            Technique::LowBlock => "low_block",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether `frame` shows this technique
    pub fn matches(&self, frame: &Frame) -> bool {
        match self {
            Technique::LeftPunch => limb(frame, LEFT_ARM).is_some_and(|arm| punch(arm, LEFT_PUNCH_DIR)),
            Technique::RightPunch => limb(frame, RIGHT_ARM).is_some_and(|arm| punch(arm, RIGHT_PUNCH_DIR)),
            Technique::LeftKick => limb(frame, LEFT_LEG).is_some_and(|leg| kick(leg, LEFT_KICK_DIR)),
            Technique::RightKick => limb(frame, RIGHT_LEG).is_some_and(|leg| kick(leg, RIGHT_KICK_DIR)),
            Technique::FrontKick => Technique::LeftKick.matches(frame) || Technique::RightKick.matches(frame),
            Technique::SideKick | Technique::RoundKick => side_kick(frame),
            Technique::HorseStance => horse_stance(frame),
            Technique::HighBlock => [LEFT_ARM, RIGHT_ARM]
                .into_iter()
                .filter_map(|arm| limb(frame, arm))
                .any(high_block),
            Technique::LowBlock => low_block(frame),
        }
    }
}

/// The technique shown in `frame`, if any
///
/// A relaxed upright stance is never a technique, even though hanging arms
/// would pass the low-block test on their own.
pub fn recognize(frame: &Frame) -> Option<Technique> {
    if is_neutral_stance(frame) {
        return None;
    }
    RECOGNITION_ORDER.into_iter().find(|t| t.matches(frame))
}

/// Standing upright, arms hanging at the sides, feet under the hips
///
/// Shoulders and hips must be visible; an unreadable arm or leg does not
/// disqualify the stance.
pub fn is_neutral_stance(frame: &Frame) -> bool {
    let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
        frame.position(LEFT_SHOULDER),
        frame.position(RIGHT_SHOULDER),
        frame.position(LEFT_HIP),
        frame.position(RIGHT_HIP),
    ) else {
        return false;
    };

    let level = (ls.1 - rs.1).abs() < 30.0 && (lh.1 - rh.1).abs() < 30.0;
    level
        && arm_relaxed(frame, LEFT_ARM)
        && arm_relaxed(frame, RIGHT_ARM)
        && leg_planted(frame, LEFT_LEG)
        && leg_planted(frame, RIGHT_LEG)
}

#[derive(Clone, Copy, Debug)]
struct Limb {
    root: (f32, f32),
    joint: (f32, f32),
    end: (f32, f32),
    degrees: f32,
}

fn limb(frame: &Frame, [root, joint, end]: [&str; 3]) -> Option<Limb> {
    let root = frame.position(root)?;
    let joint = frame.position(joint)?;
    let end = frame.position(end)?;
    let degrees = vertex_angle(root, joint, end)?.round();
    Some(Limb {
        root,
        joint,
        end,
        degrees,
    })
}

/// Straight arm at shoulder height, wrist reaching 40px past the shoulder
fn punch(arm: Limb, dir: f32) -> bool {
    arm.degrees >= STRAIGHT_ARM_DEGREES
        && arm.end.1 <= arm.root.1 + 10.0
        && (arm.end.0 - arm.root.0) * dir > 40.0
        && arm.joint.1 <= arm.root.1 + 40.0
}

/// Extended leg with the ankle above the hip, reaching 20px past it
fn kick(leg: Limb, dir: f32) -> bool {
    leg.degrees >= STRAIGHT_LEG_DEGREES && leg.end.1 < leg.root.1 && (leg.end.0 - leg.root.0) * dir > 20.0
}

fn side_kick(frame: &Frame) -> bool {
    let (Some(left), Some(right)) = (limb(frame, LEFT_LEG), limb(frame, RIGHT_LEG)) else {
        return false;
    };
    [left, right]
        .into_iter()
        .any(|leg| leg.degrees >= STRAIGHT_LEG_DEGREES && (leg.end.0 - leg.root.0).abs() > 50.0)
}

/// Bent arm with the elbow raised and the fist over the face
fn high_block(arm: Limb) -> bool {
    (70.0..=120.0).contains(&arm.degrees) && arm.end.1 < arm.root.1 - 40.0 && arm.joint.1 < arm.root.1
}

fn low_block(frame: &Frame) -> bool {
    let (Some(left), Some(right)) = (limb(frame, LEFT_ARM), limb(frame, RIGHT_ARM)) else {
        return false;
    };
    [left, right]
        .into_iter()
        .any(|arm| arm.degrees >= 120.0 && arm.end.1 > arm.root.1 + 40.0)
}

/// Feet wider than 1.5x the hips with both knees bent below hip level, plus
/// at least three of: each foot grounded, matching knee angles, knees
/// between hip and foot width
fn horse_stance(frame: &Frame) -> bool {
    let (Some(left), Some(right)) = (limb(frame, LEFT_LEG), limb(frame, RIGHT_LEG)) else {
        return false;
    };
    let hip_width = (left.root.0 - right.root.0).abs();
    let feet_width = (left.end.0 - right.end.0).abs();
    let knee_width = (left.joint.0 - right.joint.0).abs();

    let wide = feet_width > hip_width * 1.5;
    let knees_bent = [left, right]
        .iter()
        .all(|leg| leg.joint.1 > leg.root.1 + 20.0 && leg.degrees <= BENT_KNEE_DEGREES);
    if !(wide && knees_bent) {
        return false;
    }

    let supporting = [
        left.end.1 > left.joint.1 - 30.0,
        right.end.1 > right.joint.1 - 30.0,
        (left.degrees - right.degrees).abs() < 30.0,
        knee_width > hip_width * 0.8 && knee_width < feet_width * 1.2,
    ];
    supporting.iter().filter(|&&ok| ok).count() >= 3
}

fn arm_relaxed(frame: &Frame, [shoulder, elbow, wrist]: [&str; 3]) -> bool {
    let Some(shoulder) = frame.position(shoulder) else {
        return false;
    };
    let elbow = frame.position(elbow);
    let wrist = frame.position(wrist);

    let hanging = match (elbow, wrist) {
        (Some(e), Some(w)) => w.1 > e.1 && e.1 > shoulder.1 - 20.0,
        _ => true,
    };
    let at_side = wrist.map_or(true, |w| (w.0 - shoulder.0).abs() < 80.0);
    hanging && at_side
}

fn leg_planted(frame: &Frame, leg: [&str; 3]) -> bool {
    limb(frame, leg).map_or(true, |leg| {
        leg.degrees >= STRAIGHT_LEG_DEGREES && leg.end.1 > leg.joint.1 && (leg.end.0 - leg.root.0).abs() < 50.0
    })
}
