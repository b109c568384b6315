//! Position guard - "is the user in position at all?"
//!
//! When the guard fails the frame is a no-op for counting.

use serde::{Deserialize, Serialize};

use crate::geometry::vertex_angle;
use crate::pose::Frame;

use super::spec::Chain;

/// Coarse body-orientation check, e.g. a straight plank line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyLine {
    pub chain: Chain,
    pub min_degrees: f32,
    /// Pass when the line can't be measured (e.g. ankles out of frame)
    #[serde(default)]
    pub allow_unmeasured: bool,
}

/// Validity predicate evaluated before any phase transition
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionGuard {
    /// Landmarks that must all be confidently present
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub body_line: Option<BodyLine>,
}

impl PositionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, names: &[&str]) -> Self {
        self.required.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn body_line(mut self, chain: Chain, min_degrees: f32, allow_unmeasured: bool) -> Self {
        self.body_line = Some(BodyLine {
            chain,
            min_degrees,
            allow_unmeasured,
        });
        self
    }

    pub fn check(&self, frame: &Frame) -> bool {
        if !frame.has_all(&self.required) {
            return false;
        }

        match &self.body_line {
            None => true,
            Some(line) => {
                let measured = (|| {
                    vertex_angle(
                        frame.position(&line.chain.a)?,
                        frame.position(&line.chain.b)?,
                        frame.position(&line.chain.c)?,
                    )
                })();
                match measured {
                    Some(deg) => deg.round() >= line.min_degrees,
                    None => line.allow_unmeasured,
                }
            }
        }
    }
}
