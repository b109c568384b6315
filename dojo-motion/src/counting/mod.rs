//! Counting module - phase hysteresis, hold timing and form cues
//!
//! Re-exports only. All logic in submodules.

mod feedback;
mod hold;
mod phase;

pub use feedback::{FeedbackCoach, FeedbackConfig, FeedbackCues, DEFAULT_CUE_MARGIN, DEFAULT_WARMUP_REPS};
pub use hold::{HoldEvent, HoldTimer, ZoneBands, ZoneSample, DEFAULT_MAX_GAP_MS};
pub use phase::{Phase, PhaseConfig, PhaseConfigBuilder, PhaseMachine, PhaseTransition, SignalOrientation};
