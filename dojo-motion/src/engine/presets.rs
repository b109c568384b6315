//! Built-in workouts and challenges

use crate::counting::{FeedbackConfig, FeedbackCues, Phase, SignalOrientation, DEFAULT_CUE_MARGIN, DEFAULT_WARMUP_REPS};
use crate::error::Result;
use crate::pose::*;
use crate::signal::{Chain, Pair, PositionGuard, SignalSpec};
use crate::strike::{Fallback, HitShape, PlacementStrategy, SidePolicy, TargetPlacement};

use super::config::{
    ExerciseConfig, HoldChallengeConfig, HoldStage, SessionConfig, StrikeChallengeConfig,
};

/// Crunch cues trigger on a smaller torso-angle shortfall than the default
pub const CRUNCH_CUE_MARGIN: f32 = 20.0;

/// Preset names accepted by `by_name`
pub const PRESET_NAMES: [&str; 6] = [
    "pushups",
    "crunches",
    "jumping_jacks",
    "side_kick_hold",
    "max_punches",
    "vipers_reflexes",
];

pub fn by_name(name: &str) -> Option<Result<SessionConfig>> {
    let config = match name {
        "pushups" => pushups().map(SessionConfig::Workout),
        "crunches" => crunches().map(SessionConfig::Workout),
        "jumping_jacks" => jumping_jacks().map(SessionConfig::Workout),
        "side_kick_hold" => side_kick_hold().map(SessionConfig::Hold),
        "max_punches" => max_punches().map(SessionConfig::Strike),
        "vipers_reflexes" => vipers_reflexes().map(SessionConfig::Strike),
        _ => return None,
    };
    Some(config)
}

fn cues(texts: [&str; 6]) -> FeedbackConfig {
    let [warmup, reposition, go_further, return_fully, start_praise, excursion_praise] = texts;
    FeedbackConfig {
        warmup_reps: DEFAULT_WARMUP_REPS,
        margin: DEFAULT_CUE_MARGIN,
        cues: FeedbackCues {
            warmup: warmup.into(),
            reposition: reposition.into(),
            go_further: go_further.into(),
            return_fully: return_fully.into(),
            start_praise: start_praise.into(),
            excursion_praise: excursion_praise.into(),
        },
    }
}

/// Nose height above the shoulder line; down within 80px
pub fn pushups() -> Result<ExerciseConfig> {
    ExerciseConfig::builder("pushups")
        .signal(SignalSpec::VerticalGap {
            point: NOSE.into(),
            line: Pair::new(LEFT_SHOULDER, RIGHT_SHOULDER),
        })
        .thresholds(80.0, 100.0)
        .initial(Phase::Up)
        .min_rep_interval_ms(200.0)
        .guard(
            PositionGuard::new()
                .require(&[LEFT_SHOULDER, RIGHT_SHOULDER])
                .body_line(Chain::new(LEFT_SHOULDER, LEFT_HIP, LEFT_ANKLE), 140.0, true),
        )
        .feedback(cues([
            "Keep going! I'll give you tips soon!",
            "Face the camera and get in pushup position!",
            "Go lower! Get your face below your shoulders!",
            "Push all the way up! Lift your head higher!",
            "Excellent! You're crushing it!",
            "Perfect form! Keep going!",
        ]))
        .build()
}

/// Torso angle through shoulder, hip and knee midpoints; shrinks crunching up
pub fn crunches() -> Result<ExerciseConfig> {
    ExerciseConfig::builder("crunches")
        .signal(SignalSpec::MidpointAngle {
            a: Pair::new(LEFT_SHOULDER, RIGHT_SHOULDER),
            b: Pair::new(LEFT_HIP, RIGHT_HIP),
            c: Pair::new(LEFT_KNEE, RIGHT_KNEE),
        })
        .thresholds(120.0, 80.0)
        .orientation(SignalOrientation::DownIsHigh)
        .initial(Phase::Down)
        .guard(PositionGuard::new().require(&[LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP]))
        .feedback(FeedbackConfig {
            margin: CRUNCH_CUE_MARGIN,
            ..cues([
                "Keep going! I'll give you tips soon!",
                "Lie down flat and face the camera!",
                "Crunch higher! Lift those shoulders!",
                "Lower back down slowly and controlled!",
                "Perfect! Keep that steady rhythm!",
                "Great crunch! Feel those abs working!",
            ])
        })
        .build()
}

/// Mean of both elbow angles; arms overhead straighten out
pub fn jumping_jacks() -> Result<ExerciseConfig> {
    ExerciseConfig::builder("jumping_jacks")
        .signal(SignalSpec::MeanJointAngle {
            left: Chain::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            right: Chain::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
        })
        .thresholds(60.0, 120.0)
        .initial(Phase::Down)
        .feedback(cues([
            "Keep jumping! I'll give you tips soon!",
            "Stand up straight and face the camera!",
            "Jump higher! Get those arms up!",
            "Bring your arms all the way down!",
            "Perfect! Keep jumping with rhythm!",
            "Great jump! Keep that energy up!",
        ]))
        .build()
}

/// Right leg then left leg, each held straight out to the side
pub fn side_kick_hold() -> Result<HoldChallengeConfig> {
    let stage = |name: &str, hip: &str, knee: &str, ankle: &str| {
        HoldStage::new(name, SignalSpec::JointAngle(Chain::new(hip, knee, ankle)), 160.0, 145.0).with_height(
            SignalSpec::HeightRatio {
                upper: hip.into(),
                lower: ankle.into(),
            },
            0.6,
        )
    };

    HoldChallengeConfig::builder("side_kick_hold")
        .stage(stage("right_leg", RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE))
        .stage(stage("left_leg", LEFT_HIP, LEFT_KNEE, LEFT_ANKLE))
        .switch_delay_ms(2500.0)
        .build()
}

/// 30 seconds of punches at a paddle placed on the right wrist
pub fn max_punches() -> Result<StrikeChallengeConfig> {
    let placement = TargetPlacement::new(
        PlacementStrategy::AtAnchor {
            anchors: vec![RIGHT_WRIST.into()],
        },
        40.0,
        HitShape::Square,
        Fallback { x: 0.75, y: 0.3 },
    )?;
    StrikeChallengeConfig::builder("max_punches", placement)
        .limbs(&[LEFT_WRIST, RIGHT_WRIST])
        .min_velocity(0.2)
        .cooldown_ms(50.0)
        .duration_seconds(30)
        .build()
}

/// One dot halfway to a random edge; first strike ends the round
pub fn vipers_reflexes() -> Result<StrikeChallengeConfig> {
    let placement = TargetPlacement::new(
        PlacementStrategy::TowardEdge {
            anchors: vec![RIGHT_SHOULDER.into(), LEFT_SHOULDER.into()],
            blend: 0.5,
            side: SidePolicy::Random,
        },
        40.0,
        HitShape::Circle,
        Fallback::CENTER,
    )?;
    StrikeChallengeConfig::builder("vipers_reflexes", placement)
        .limbs(&[LEFT_WRIST, RIGHT_WRIST])
        .min_velocity(0.2)
        .single_shot()
        .countdown_seconds(5)
        .build()
}
