//! Geometry toolkit - stateless joint angles, distances and velocities
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod points;
mod velocity;

pub use angles::{angle, measure_angle, vertex_angle, AngleMeasurement};
pub use points::{distance, distance_between, distance_squared, midpoint};
pub use velocity::{velocity, PointSample, PointTrack};
