//! Signal module - frame → scalar motion signal, the position guard and
//! static technique poses
//!
//! Re-exports only. All logic in submodules.

mod guard;
mod spec;
mod technique;

pub use guard::{BodyLine, PositionGuard};
pub use spec::{Chain, Pair, SignalSpec};
pub use technique::{is_neutral_stance, recognize, Technique, STRAIGHT_ARM_DEGREES, STRAIGHT_LEG_DEGREES};
