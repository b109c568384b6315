//! Form coaching cues derived from the phase machine's view of a rep

use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseConfig};

/// Reps counted before form cues start
pub const DEFAULT_WARMUP_REPS: u32 = 5;

/// How far short of a threshold (signal units) before a cue nags
pub const DEFAULT_CUE_MARGIN: f32 = 30.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCues {
    pub warmup: String,
    pub reposition: String,
    pub go_further: String,
    pub return_fully: String,
    pub start_praise: String,
    pub excursion_praise: String,
}

impl Default for FeedbackCues {
    fn default() -> Self {
        Self {
            warmup: "Keep going, warming up".into(),
            reposition: "Face the camera and get in position".into(),
            go_further: "Go further".into(),
            return_fully: "Return all the way".into(),
            start_praise: "Good start position".into(),
            excursion_praise: "Good depth".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_warmup")]
    pub warmup_reps: u32,
    #[serde(default = "default_margin")]
    pub margin: f32,
    #[serde(default)]
    pub cues: FeedbackCues,
}

fn default_warmup() -> u32 {
    DEFAULT_WARMUP_REPS
}

fn default_margin() -> f32 {
    DEFAULT_CUE_MARGIN
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            warmup_reps: DEFAULT_WARMUP_REPS,
            margin: DEFAULT_CUE_MARGIN,
            cues: FeedbackCues::default(),
        }
    }
}

/// Picks one cue per frame, reporting it only when it changes
pub struct FeedbackCoach {
    config: FeedbackConfig,
    current: Option<String>,
}

impl FeedbackCoach {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn assess(
        &mut self,
        phases: &PhaseConfig,
        phase: Phase,
        reps: u32,
        guard_ok: bool,
        signal: Option<f32>,
    ) -> Option<String> {
        let cue = self.select(phases, phase, reps, guard_ok, signal).to_string();
        if self.current.as_deref() == Some(cue.as_str()) {
            return None;
        }
        self.current = Some(cue.clone());
        Some(cue)
    }

    fn select(
        &self,
        phases: &PhaseConfig,
        phase: Phase,
        reps: u32,
        guard_ok: bool,
        signal: Option<f32>,
    ) -> &str {
        let cues = &self.config.cues;
        if reps < self.config.warmup_reps {
            return &cues.warmup;
        }
        let signal = match signal {
            Some(s) if guard_ok => s,
            _ => return &cues.reposition,
        };

        let in_start = phase == phases.initial;
        let short = phases.shortfall(phase.other(), signal);
        match (in_start, short > self.config.margin) {
            (true, true) => &cues.go_further,
            (false, true) => &cues.return_fully,
            (true, false) => &cues.start_praise,
            (false, false) => &cues.excursion_praise,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
