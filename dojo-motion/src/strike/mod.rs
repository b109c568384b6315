//! Strike module - hit detection and target placement
//!
//! Re-exports only. All logic in submodules.

mod hit;
mod placement;

pub use hit::{Hit, HitConfig, HitDetector, HitShape, Target, DEFAULT_HIT_COOLDOWN_MS, DEFAULT_MIN_VELOCITY};
pub use placement::{Fallback, FrameSize, PlacementStrategy, Side, SidePolicy, TargetPlacement};
