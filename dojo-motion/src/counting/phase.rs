//! Hysteresis phase machine
//!
//! Two thresholds, one per direction, so a noisy signal sitting on a
//! boundary can't flap between phases. A rep is confirmed only when the
//! motion returns to the starting phase.

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Where in the motion cycle the user is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Up,
    Down,
}

impl Phase {
    pub fn other(self) -> Self {
        match self {
            Phase::Up => Phase::Down,
            Phase::Down => Phase::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Up => "up",
            Phase::Down => "down",
        }
    }
}

/// Whether "down" means a small or a large signal value
///
/// Elbow angle shrinks going down; a crunch torso angle grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalOrientation {
    #[default]
    DownIsLow,
    DownIsHigh,
}

/// Validated thresholds for one exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub enter_down: f32,
    pub enter_up: f32,
    pub initial: Phase,
    #[serde(default)]
    pub orientation: SignalOrientation,
    /// Minimum gap between counted reps (0 = none)
    #[serde(default)]
    pub min_rep_interval_ms: f64,
}

impl PhaseConfig {
    pub fn builder(name: &str) -> PhaseConfigBuilder {
        PhaseConfigBuilder {
            name: name.to_string(),
            enter_down: 90.0,
            enter_up: 150.0,
            initial: Phase::Up,
            orientation: SignalOrientation::DownIsLow,
            min_rep_interval_ms: 0.0,
        }
    }

    /// Check threshold ordering; deserialized configs go through this too
    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| MotionError::InvalidThresholds {
            name: name.to_string(),
            reason,
        };

        if !self.enter_down.is_finite() || !self.enter_up.is_finite() {
            return Err(invalid("thresholds must be finite".into()));
        }
        match self.orientation {
            SignalOrientation::DownIsLow if self.enter_down >= self.enter_up => Err(invalid(format!(
                "enter_down ({}) must be below enter_up ({})",
                self.enter_down, self.enter_up
            ))),
            SignalOrientation::DownIsHigh if self.enter_down <= self.enter_up => Err(invalid(format!(
                "enter_down ({}) must be above enter_up ({}) when down is high",
                self.enter_down, self.enter_up
            ))),
            _ if !self.min_rep_interval_ms.is_finite() || self.min_rep_interval_ms < 0.0 => {
                Err(MotionError::InvalidCooldown(self.min_rep_interval_ms))
            }
            _ => Ok(()),
        }
    }

    pub fn threshold_for(&self, phase: Phase) -> f32 {
        match phase {
            Phase::Down => self.enter_down,
            Phase::Up => self.enter_up,
        }
    }

    /// How far `signal` still is from entering `phase`; <= 0 means reached
    pub fn shortfall(&self, phase: Phase, signal: f32) -> f32 {
        let threshold = self.threshold_for(phase);
        let goes_low = matches!(
            (phase, self.orientation),
            (Phase::Down, SignalOrientation::DownIsLow) | (Phase::Up, SignalOrientation::DownIsHigh)
        );
        if goes_low {
            signal - threshold
        } else {
            threshold - signal
        }
    }

    pub fn reaches(&self, phase: Phase, signal: f32) -> bool {
        self.shortfall(phase, signal) <= 0.0
    }
}

pub struct PhaseConfigBuilder {
    name: String,
    enter_down: f32,
    enter_up: f32,
    initial: Phase,
    orientation: SignalOrientation,
    min_rep_interval_ms: f64,
}

impl PhaseConfigBuilder {
    pub fn thresholds(mut self, enter_down: f32, enter_up: f32) -> Self {
        self.enter_down = enter_down;
        self.enter_up = enter_up;
        self
    }

    pub fn initial(mut self, phase: Phase) -> Self {
        self.initial = phase;
        self
    }

    pub fn orientation(mut self, orientation: SignalOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn min_rep_interval_ms(mut self, ms: f64) -> Self {
        self.min_rep_interval_ms = ms;
        self
    }

    pub fn build(self) -> Result<PhaseConfig> {
        let config = PhaseConfig {
            enter_down: self.enter_down,
            enter_up: self.enter_up,
            initial: self.initial,
            orientation: self.orientation,
            min_rep_interval_ms: self.min_rep_interval_ms,
        };
        config.validate(&self.name)?;
        Ok(config)
    }
}

/// A phase change, carrying the new rep count when it completed a rep
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    pub rep: Option<u32>,
}

/// Converts a motion signal into phase transitions and rep counts
pub struct PhaseMachine {
    config: PhaseConfig,
    phase: Phase,
    reps: u32,
    last_rep_ms: Option<f64>,
}

impl PhaseMachine {
    pub fn new(config: PhaseConfig) -> Self {
        Self {
            phase: config.initial,
            config,
            reps: 0,
            last_rep_ms: None,
        }
    }

    /// Feed one frame's signal
    ///
    /// `None` (pose lost) holds the current phase.
    pub fn step(&mut self, signal: Option<f32>, now_ms: f64) -> Option<PhaseTransition> {
        let signal = signal?;
        let target = self.phase.other();
        if !self.config.reaches(target, signal) {
            return None;
        }

        let completes_rep = target == self.config.initial;
        if completes_rep && !self.rep_interval_elapsed(now_ms) {
            return None;
        }

        let from = self.phase;
        self.phase = target;
        let rep = if completes_rep {
            self.reps += 1;
            self.last_rep_ms = Some(now_ms);
            Some(self.reps)
        } else {
            None
        };

        log::debug!(
            "phase {} -> {} (signal {:.0}, reps {})",
            from.as_str(),
            target.as_str(),
            signal,
            self.reps
        );
        Some(PhaseTransition { from, to: target, rep })
    }

    fn rep_interval_elapsed(&self, now_ms: f64) -> bool {
        match self.last_rep_ms {
            Some(last) => now_ms - last > self.config.min_rep_interval_ms,
            None => true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Back to the initial phase with zero reps
    pub fn reset(&mut self) {
        self.phase = self.config.initial;
        self.reps = 0;
        self.last_rep_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pushups() -> PhaseConfig {
        PhaseConfig::builder("pushups")
            .thresholds(90.0, 150.0)
            .initial(Phase::Up)
            .build()
            .unwrap()
    }

    fn run(machine: &mut PhaseMachine, signal: &[f32]) -> Vec<Phase> {
        signal
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                machine.step(Some(s), i as f64 * 33.0);
                machine.phase()
            })
            .collect()
    }

    #[test]
    fn test_elbow_sequence_counts_one_rep() {
        let mut m = PhaseMachine::new(pushups());
        let phases = run(&mut m, &[170.0, 170.0, 95.0, 80.0, 95.0, 170.0]);
        use Phase::*;
        assert_eq!(phases, vec![Up, Up, Up, Down, Down, Up]);
        assert_eq!(m.reps(), 1);
    }

    #[test]
    fn test_incomplete_descent_not_counted() {
        let mut m = PhaseMachine::new(pushups());
        run(&mut m, &[170.0, 80.0, 120.0, 100.0]);
        assert_eq!(m.phase(), Phase::Down);
        assert_eq!(m.reps(), 0);
    }

    #[test]
    fn test_missing_signal_holds_phase() {
        let mut m = PhaseMachine::new(pushups());
        m.step(Some(80.0), 0.0);
        assert_eq!(m.step(None, 33.0), None);
        assert_eq!(m.phase(), Phase::Down);
        assert_eq!(m.reps(), 0);
    }

    #[test]
    fn test_transition_reports_rep() {
        let mut m = PhaseMachine::new(pushups());
        let down = m.step(Some(85.0), 0.0).unwrap();
        assert_eq!((down.from, down.to, down.rep), (Phase::Up, Phase::Down, None));
        let up = m.step(Some(160.0), 500.0).unwrap();
        assert_eq!((up.from, up.to, up.rep), (Phase::Down, Phase::Up, Some(1)));
    }

    #[test]
    fn test_down_is_high_counts_on_return_down() {
        // crunches: torso angle drops when crunching up
        let config = PhaseConfig::builder("crunches")
            .thresholds(120.0, 80.0)
            .initial(Phase::Down)
            .orientation(SignalOrientation::DownIsHigh)
            .build()
            .unwrap();
        let mut m = PhaseMachine::new(config);
        use Phase::*;
        assert_eq!(run(&mut m, &[130.0, 100.0, 75.0, 100.0, 125.0]), vec![Down, Down, Up, Up, Down]);
        assert_eq!(m.reps(), 1);
    }

    #[test]
    fn test_min_rep_interval_defers_return_edge() {
        let config = PhaseConfig::builder("pushups")
            .thresholds(90.0, 150.0)
            .min_rep_interval_ms(200.0)
            .build()
            .unwrap();
        let mut m = PhaseMachine::new(config);
        m.step(Some(80.0), 0.0);
        m.step(Some(160.0), 100.0);
        assert_eq!(m.reps(), 1);

        m.step(Some(80.0), 150.0);
        // too soon after the last rep: stays down
        assert_eq!(m.step(Some(160.0), 250.0), None);
        assert_eq!(m.phase(), Phase::Down);
        // still up on a later frame, now counted
        assert!(m.step(Some(160.0), 320.0).is_some());
        assert_eq!(m.reps(), 2);
    }

    #[test]
    fn test_reset() {
        let mut m = PhaseMachine::new(pushups());
        run(&mut m, &[80.0, 170.0, 80.0]);
        m.reset();
        assert_eq!(m.phase(), Phase::Up);
        assert_eq!(m.reps(), 0);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = PhaseConfig::builder("pushups").thresholds(150.0, 90.0).build();
        assert!(matches!(err, Err(MotionError::InvalidThresholds { .. })));

        let err = PhaseConfig::builder("pushups").thresholds(90.0, 90.0).build();
        assert!(err.is_err());

        let err = PhaseConfig::builder("crunches")
            .thresholds(80.0, 120.0)
            .orientation(SignalOrientation::DownIsHigh)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_negative_interval_rejected() {
        let err = PhaseConfig::builder("x").min_rep_interval_ms(-1.0).build();
        assert_eq!(err, Err(MotionError::InvalidCooldown(-1.0)));
    }

    #[test]
    fn test_shortfall() {
        let c = pushups();
        assert_eq!(c.shortfall(Phase::Down, 100.0), 10.0);
        assert_eq!(c.shortfall(Phase::Up, 100.0), 50.0);
        assert!(c.reaches(Phase::Down, 90.0));
    }

    proptest! {
        #[test]
        fn prop_signal_above_up_threshold_never_counts(
            signal in proptest::collection::vec(150.0f32..180.0, 1..200)
        ) {
            let mut m = PhaseMachine::new(pushups());
            for (i, s) in signal.iter().enumerate() {
                m.step(Some(*s), i as f64 * 33.0);
            }
            prop_assert_eq!(m.reps(), 0);
            prop_assert_eq!(m.phase(), Phase::Up);
        }

        #[test]
        fn prop_one_cycle_is_one_rep(
            descent in proptest::collection::vec(91.0f32..149.0, 0..30),
            bottom in proptest::collection::vec(0.0f32..90.0, 1..30),
            ascent in proptest::collection::vec(91.0f32..149.0, 0..30),
        ) {
            let mut m = PhaseMachine::new(pushups());
            let signal: Vec<f32> = std::iter::once(170.0)
                .chain(descent)
                .chain(bottom)
                .chain(ascent)
                .chain(std::iter::once(170.0))
                .collect();
            for (i, s) in signal.iter().enumerate() {
                m.step(Some(*s), i as f64 * 33.0);
            }
            prop_assert_eq!(m.reps(), 1);
        }
    }
}
