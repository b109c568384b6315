//! Configuration records for workouts and challenges
//!
//! Every exercise is data: a signal, thresholds and a guard. Builders and
//! `validate()` reject nonsensical definitions before an engine exists.

use serde::{Deserialize, Serialize};

use crate::counting::{FeedbackConfig, Phase, PhaseConfig, PhaseConfigBuilder, SignalOrientation, ZoneBands, DEFAULT_MAX_GAP_MS};
use crate::error::{MotionError, Result};
use crate::session::DEFAULT_COUNTDOWN_SECONDS;
use crate::signal::{PositionGuard, SignalSpec};
use crate::strike::{FrameSize, HitConfig, TargetPlacement};

use super::hold_challenge::HoldChallengeEngine;
use super::motion::MotionEngine;
use super::strike_challenge::StrikeChallengeEngine;
use super::workout::WorkoutEngine;

fn default_countdown() -> u32 {
    DEFAULT_COUNTDOWN_SECONDS
}

fn default_max_gap() -> f64 {
    DEFAULT_MAX_GAP_MS
}

fn check_landmarks(name: &str, signal: &SignalSpec) -> Result<()> {
    if signal.landmarks().iter().any(|n| n.is_empty()) {
        return Err(MotionError::EmptyLandmarkSet(name.to_string()));
    }
    Ok(())
}

fn duration_ms(seconds: Option<u32>) -> Option<f64> {
    seconds.map(|s| f64::from(s) * 1000.0)
}

// ============================================================================
// REP WORKOUTS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    pub signal: SignalSpec,
    pub phases: PhaseConfig,
    #[serde(default)]
    pub guard: PositionGuard,
    #[serde(default)]
    pub feedback: Option<FeedbackConfig>,
    #[serde(default = "default_countdown")]
    pub countdown_seconds: u32,
    /// `None` runs until the user finishes
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl ExerciseConfig {
    pub fn builder(name: &str) -> ExerciseConfigBuilder {
        ExerciseConfigBuilder {
            name: name.to_string(),
            signal: None,
            phases: PhaseConfig::builder(name),
            guard: PositionGuard::default(),
            feedback: None,
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            duration_seconds: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_landmarks(&self.name, &self.signal)?;
        self.phases.validate(&self.name)
    }

    pub fn duration_ms(&self) -> Option<f64> {
        duration_ms(self.duration_seconds)
    }
}

pub struct ExerciseConfigBuilder {
    name: String,
    signal: Option<SignalSpec>,
    phases: PhaseConfigBuilder,
    guard: PositionGuard,
    feedback: Option<FeedbackConfig>,
    countdown_seconds: u32,
    duration_seconds: Option<u32>,
}

impl ExerciseConfigBuilder {
    pub fn signal(mut self, signal: SignalSpec) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn thresholds(mut self, enter_down: f32, enter_up: f32) -> Self {
        self.phases = self.phases.thresholds(enter_down, enter_up);
        self
    }

    pub fn initial(mut self, phase: Phase) -> Self {
        self.phases = self.phases.initial(phase);
        self
    }

    pub fn orientation(mut self, orientation: SignalOrientation) -> Self {
        self.phases = self.phases.orientation(orientation);
        self
    }

    pub fn min_rep_interval_ms(mut self, ms: f64) -> Self {
        self.phases = self.phases.min_rep_interval_ms(ms);
        self
    }

    pub fn guard(mut self, guard: PositionGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn feedback(mut self, feedback: FeedbackConfig) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn countdown_seconds(mut self, seconds: u32) -> Self {
        self.countdown_seconds = seconds;
        self
    }

    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<ExerciseConfig> {
        let signal = self
            .signal
            .ok_or_else(|| MotionError::EmptyLandmarkSet(self.name.clone()))?;
        check_landmarks(&self.name, &signal)?;
        Ok(ExerciseConfig {
            phases: self.phases.build()?,
            name: self.name,
            signal,
            guard: self.guard,
            feedback: self.feedback,
            countdown_seconds: self.countdown_seconds,
            duration_seconds: self.duration_seconds,
        })
    }
}

// ============================================================================
// HOLD CHALLENGES
// ============================================================================

/// Secondary "is the foot still up" check on a stage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightCheck {
    pub signal: SignalSpec,
    /// Below this the foot counts as dropped
    pub min: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldStage {
    pub name: String,
    pub signal: SignalSpec,
    pub bands: ZoneBands,
    #[serde(default)]
    pub height: Option<HeightCheck>,
}

impl HoldStage {
    pub fn new(name: &str, signal: SignalSpec, zone: f32, presence: f32) -> Self {
        Self {
            name: name.to_string(),
            signal,
            bands: ZoneBands { zone, presence },
            height: None,
        }
    }

    pub fn with_height(mut self, signal: SignalSpec, min: f32) -> Self {
        self.height = Some(HeightCheck { signal, min });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldChallengeConfig {
    pub name: String,
    pub stages: Vec<HoldStage>,
    /// Unscored pause between stages
    #[serde(default)]
    pub switch_delay_ms: f64,
    #[serde(default = "default_max_gap")]
    pub max_gap_ms: f64,
    #[serde(default = "default_countdown")]
    pub countdown_seconds: u32,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl HoldChallengeConfig {
    pub fn builder(name: &str) -> HoldChallengeConfigBuilder {
        HoldChallengeConfigBuilder {
            config: HoldChallengeConfig {
                name: name.to_string(),
                stages: Vec::new(),
                switch_delay_ms: 0.0,
                max_gap_ms: DEFAULT_MAX_GAP_MS,
                countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
                duration_seconds: None,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(MotionError::MissingStages(self.name.clone()));
        }
        for stage in &self.stages {
            check_landmarks(&stage.name, &stage.signal)?;
            let ZoneBands { zone, presence } = stage.bands;
            if !(zone.is_finite() && presence.is_finite()) || presence > zone {
                return Err(MotionError::InvalidThresholds {
                    name: stage.name.clone(),
                    reason: format!("presence ({}) must not exceed zone ({})", presence, zone),
                });
            }
        }
        for ms in [self.switch_delay_ms, self.max_gap_ms] {
            if !ms.is_finite() || ms < 0.0 {
                return Err(MotionError::InvalidCooldown(ms));
            }
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> Option<f64> {
        duration_ms(self.duration_seconds)
    }
}

pub struct HoldChallengeConfigBuilder {
    config: HoldChallengeConfig,
}

impl HoldChallengeConfigBuilder {
    pub fn stage(mut self, stage: HoldStage) -> Self {
        self.config.stages.push(stage);
        self
    }

    pub fn switch_delay_ms(mut self, ms: f64) -> Self {
        self.config.switch_delay_ms = ms;
        self
    }

    pub fn max_gap_ms(mut self, ms: f64) -> Self {
        self.config.max_gap_ms = ms;
        self
    }

    pub fn countdown_seconds(mut self, seconds: u32) -> Self {
        self.config.countdown_seconds = seconds;
        self
    }

    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.config.duration_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<HoldChallengeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// STRIKE CHALLENGES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrikeChallengeConfig {
    pub name: String,
    /// Tracked limb landmarks, e.g. both wrists
    pub limbs: Vec<String>,
    #[serde(default)]
    pub hit: HitConfig,
    pub placement: TargetPlacement,
    #[serde(default = "default_countdown")]
    pub countdown_seconds: u32,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
}

impl StrikeChallengeConfig {
    pub fn builder(name: &str, placement: TargetPlacement) -> StrikeChallengeConfigBuilder {
        StrikeChallengeConfigBuilder {
            config: StrikeChallengeConfig {
                name: name.to_string(),
                limbs: Vec::new(),
                hit: HitConfig::default(),
                placement,
                countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
                duration_seconds: None,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.limbs.is_empty() || self.limbs.iter().any(|l| l.is_empty()) {
            return Err(MotionError::EmptyLandmarkSet(self.name.clone()));
        }
        self.hit.validate()?;
        self.placement.validate()
    }

    pub fn duration_ms(&self) -> Option<f64> {
        duration_ms(self.duration_seconds)
    }
}

pub struct StrikeChallengeConfigBuilder {
    config: StrikeChallengeConfig,
}

impl StrikeChallengeConfigBuilder {
    pub fn limbs(mut self, names: &[&str]) -> Self {
        self.config.limbs = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn min_velocity(mut self, px_per_ms: f32) -> Self {
        self.config.hit.min_velocity = px_per_ms;
        self
    }

    pub fn cooldown_ms(mut self, ms: f64) -> Self {
        self.config.hit.cooldown_ms = ms;
        self
    }

    pub fn single_shot(mut self) -> Self {
        self.config.hit.single_shot = true;
        self
    }

    pub fn countdown_seconds(mut self, seconds: u32) -> Self {
        self.config.countdown_seconds = seconds;
        self
    }

    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.config.duration_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<StrikeChallengeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ============================================================================
// ANY SESSION
// ============================================================================

/// Tagged union accepted from JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionConfig {
    Workout(ExerciseConfig),
    Hold(HoldChallengeConfig),
    Strike(StrikeChallengeConfig),
}

impl SessionConfig {
    pub fn name(&self) -> &str {
        match self {
            SessionConfig::Workout(c) => &c.name,
            SessionConfig::Hold(c) => &c.name,
            SessionConfig::Strike(c) => &c.name,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SessionConfig::Workout(c) => c.validate(),
            SessionConfig::Hold(c) => c.validate(),
            SessionConfig::Strike(c) => c.validate(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the matching engine; `seed` drives randomised target sides
    pub fn into_engine(self, frame_size: FrameSize, seed: u64) -> Result<Box<dyn MotionEngine>> {
        Ok(match self {
            SessionConfig::Workout(c) => Box::new(WorkoutEngine::new(c)?),
            SessionConfig::Hold(c) => Box::new(HoldChallengeEngine::new(c)?),
            SessionConfig::Strike(c) => Box::new(StrikeChallengeEngine::new(c, frame_size, seed)?),
        })
    }
}
