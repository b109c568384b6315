//! Target placement relative to a body anchor
//!
//! Placement never fails at runtime: a missing anchor falls back to a fixed
//! fraction of the frame. Every result is clamped so the whole target stays
//! on screen.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::geometry::distance_between;
use crate::pose::Frame;
use crate::signal::Chain;

use super::hit::{HitShape, Target};

/// Video frame dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

impl FrameSize {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(MotionError::InvalidFrameSize { width, height });
        }
        Ok(Self { width, height })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Which frame edge a target leans toward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePolicy {
    /// Coin flip per activation so the user can't anticipate
    #[default]
    Random,
    Fixed(Side),
}

impl SidePolicy {
    fn pick(&self, rng: &mut impl Rng) -> Side {
        match self {
            SidePolicy::Random if rng.gen_bool(0.5) => Side::Left,
            SidePolicy::Random => Side::Right,
            SidePolicy::Fixed(side) => *side,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// On the first confident anchor
    AtAnchor { anchors: Vec<String> },
    /// `anchor + (edge - anchor) * blend` horizontally
    TowardEdge {
        anchors: Vec<String>,
        blend: f32,
        #[serde(default)]
        side: SidePolicy,
    },
    /// Arm's length times `factor` out from the chain's first landmark
    ArmReach {
        arm: Chain,
        factor: f32,
        #[serde(default)]
        side: SidePolicy,
    },
}

/// Where to put a target when the anchor can't be seen, as frame fractions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub x: f32,
    pub y: f32,
}

impl Fallback {
    pub const CENTER: Fallback = Fallback { x: 0.5, y: 0.5 };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPlacement {
    pub strategy: PlacementStrategy,
    pub radius: f32,
    #[serde(default)]
    pub shape: HitShape,
    pub fallback: Fallback,
}

impl TargetPlacement {
    pub fn new(strategy: PlacementStrategy, radius: f32, shape: HitShape, fallback: Fallback) -> Result<Self> {
        let placement = Self {
            strategy,
            radius,
            shape,
            fallback,
        };
        placement.validate()?;
        Ok(placement)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(MotionError::InvalidRadius(self.radius));
        }
        match &self.strategy {
            PlacementStrategy::AtAnchor { anchors } | PlacementStrategy::TowardEdge { anchors, .. }
                if anchors.is_empty() =>
            {
                Err(MotionError::EmptyLandmarkSet("target anchor".into()))
            }
            PlacementStrategy::TowardEdge { blend, .. } if !(0.0..=1.0).contains(blend) => {
                Err(MotionError::InvalidBlend(*blend))
            }
            PlacementStrategy::ArmReach { factor, .. } if !factor.is_finite() || *factor < 0.0 => {
                Err(MotionError::InvalidBlend(*factor))
            }
            _ => Ok(()),
        }
    }

    /// Compute a target for this activation
    pub fn place(&self, frame: &Frame, size: FrameSize, rng: &mut impl Rng) -> Target {
        let (x, y) = self.anchored(frame, size, rng).unwrap_or_else(|| {
            log::warn!("target anchor not visible, using fallback position");
            (self.fallback.x * size.width, self.fallback.y * size.height)
        });

        let target = Target::new(
            clamp_axis(x, self.radius, size.width),
            clamp_axis(y, self.radius, size.height),
            self.radius,
            self.shape,
        );
        log::debug!("target placed at ({:.0}, {:.0})", target.x, target.y);
        target
    }

    fn anchored(&self, frame: &Frame, size: FrameSize, rng: &mut impl Rng) -> Option<(f32, f32)> {
        match &self.strategy {
            PlacementStrategy::AtAnchor { anchors } => first_visible(frame, anchors),
            PlacementStrategy::TowardEdge { anchors, blend, side } => {
                let (ax, ay) = first_visible(frame, anchors)?;
                let edge = match side.pick(rng) {
                    Side::Left => self.radius,
                    Side::Right => size.width - self.radius,
                };
                Some((ax + (edge - ax) * blend, ay))
            }
            PlacementStrategy::ArmReach { arm, factor, side } => {
                let shoulder = frame.position(&arm.a)?;
                let elbow = frame.position(&arm.b)?;
                let wrist = frame.position(&arm.c)?;
                let reach = (distance_between(shoulder, elbow) + distance_between(elbow, wrist)) * factor;
                let dx = match side.pick(rng) {
                    Side::Left => -reach,
                    Side::Right => reach,
                };
                Some((shoulder.0 + dx, shoulder.1))
            }
        }
    }
}

fn first_visible(frame: &Frame, anchors: &[String]) -> Option<(f32, f32)> {
    anchors.iter().find_map(|name| frame.position(name))
}

/// Keep `radius` of clearance from both ends; centre when it can't fit
fn clamp_axis(value: f32, radius: f32, length: f32) -> f32 {
    if length <= radius * 2.0 {
        length / 2.0
    } else {
        value.clamp(radius, length - radius)
    }
}
