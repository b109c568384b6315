//! Engine module - configuration records, presets and the session engines
//!
//! Re-exports only. All logic in submodules.

mod config;
mod hold_challenge;
mod motion;
pub mod presets;
mod runner;
mod strike_challenge;
mod workout;

pub use config::{
    ExerciseConfig, ExerciseConfigBuilder, HeightCheck, HoldChallengeConfig, HoldChallengeConfigBuilder, HoldStage,
    SessionConfig, StrikeChallengeConfig, StrikeChallengeConfigBuilder,
};
pub use hold_challenge::HoldChallengeEngine;
pub use motion::{MotionEngine, MotionEvent, Snapshot};
pub use runner::SessionRunner;
pub use strike_challenge::StrikeChallengeEngine;
pub use workout::WorkoutEngine;
