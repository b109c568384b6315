//! Strike detection against a target
//!
//! A hit needs the limb inside the target AND moving faster than the
//! velocity gate, so a hand resting on the target never scores. Each limb
//! has its own cooldown.

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::geometry::{distance_squared, PointTrack};
use crate::pose::Frame;

/// Default minimum limb speed for a strike (px/ms)
pub const DEFAULT_MIN_VELOCITY: f32 = 0.2;

/// Default per-limb cooldown (ms)
pub const DEFAULT_HIT_COOLDOWN_MS: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitShape {
    #[default]
    Circle,
    /// Axis-aligned box with half-side `radius`
    Square,
}

/// Screen-space target region
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default)]
    pub shape: HitShape,
}

impl Target {
    pub fn new(x: f32, y: f32, radius: f32, shape: HitShape) -> Self {
        Self { x, y, radius, shape }
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        match self.shape {
            HitShape::Circle => distance_squared((self.x, self.y), point) <= self.radius * self.radius,
            HitShape::Square => {
                (point.0 - self.x).abs() <= self.radius && (point.1 - self.y).abs() <= self.radius
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitConfig {
    pub min_velocity: f32,
    pub cooldown_ms: f64,
    /// First hit ends the round
    #[serde(default)]
    pub single_shot: bool,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            min_velocity: DEFAULT_MIN_VELOCITY,
            cooldown_ms: DEFAULT_HIT_COOLDOWN_MS,
            single_shot: false,
        }
    }
}

impl HitConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cooldown_ms.is_finite() || self.cooldown_ms < 0.0 {
            return Err(MotionError::InvalidCooldown(self.cooldown_ms));
        }
        if !self.min_velocity.is_finite() || self.min_velocity < 0.0 {
            return Err(MotionError::InvalidThresholds {
                name: "hit".into(),
                reason: format!("min_velocity must be >= 0, got {}", self.min_velocity),
            });
        }
        Ok(())
    }
}

/// An accepted strike
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hit {
    pub limb: String,
    pub time_ms: f64,
    /// px/ms at the moment of impact
    pub velocity: f32,
    /// Time since the target appeared, in single-shot rounds
    pub reaction_ms: Option<f64>,
    pub count: u32,
}

/// Per-limb state: motion track plus cooldown stamp
#[derive(Clone, Debug)]
struct LimbState {
    name: String,
    track: PointTrack,
    last_hit_ms: Option<f64>,
}

impl LimbState {
    fn cooling_down(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        matches!(self.last_hit_ms, Some(last) if now_ms - last <= cooldown_ms)
    }
}

pub struct HitDetector {
    config: HitConfig,
    limbs: Vec<LimbState>,
    target: Option<Target>,
    target_shown_ms: f64,
    hits: u32,
    finished: bool,
}

impl HitDetector {
    pub fn new(limbs: &[&str], config: HitConfig) -> Result<Self> {
        if limbs.is_empty() {
            return Err(MotionError::EmptyLandmarkSet("hit detector limbs".into()));
        }
        config.validate()?;
        Ok(Self {
            config,
            limbs: limbs
                .iter()
                .map(|name| LimbState {
                    name: name.to_string(),
                    track: PointTrack::new(),
                    last_hit_ms: None,
                })
                .collect(),
            target: None,
            target_shown_ms: 0.0,
            hits: 0,
            finished: false,
        })
    }

    /// Place (or replace) the target; reaction time counts from `now_ms`
    pub fn set_target(&mut self, target: Target, now_ms: f64) {
        self.target = Some(target);
        self.target_shown_ms = now_ms;
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Evaluate one frame, limbs in configured order
    ///
    /// Tracks keep updating with no target up so velocity is ready the
    /// moment one appears.
    pub fn process(&mut self, frame: &Frame) -> Vec<Hit> {
        let now = frame.timestamp_ms;
        let mut hits = Vec::new();

        for limb in self.limbs.iter_mut() {
            let observed = frame.position(&limb.name);
            let (track, speed) = limb.track.step(observed, now);
            limb.track = track;

            if self.finished {
                continue;
            }
            let (Some(target), Some(point), Some(speed)) = (self.target.as_ref(), observed, speed) else {
                continue;
            };
            if !target.contains(point)
                || speed <= self.config.min_velocity
                || limb.cooling_down(now, self.config.cooldown_ms)
            {
                continue;
            }

            limb.last_hit_ms = Some(now);
            self.hits += 1;
            let reaction_ms = self
                .config
                .single_shot
                .then(|| now - self.target_shown_ms);
            log::debug!("hit #{} by {} at {:.2}px/ms", self.hits, limb.name, speed);
            hits.push(Hit {
                limb: limb.name.clone(),
                time_ms: now,
                velocity: speed,
                reaction_ms,
                count: self.hits,
            });

            if self.config.single_shot {
                self.finished = true;
            }
        }

        hits
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn reset(&mut self) {
        for limb in self.limbs.iter_mut() {
            limb.track = PointTrack::new();
            limb.last_hit_ms = None;
        }
        self.target = None;
        self.target_shown_ms = 0.0;
        self.hits = 0;
        self.finished = false;
    }
}
