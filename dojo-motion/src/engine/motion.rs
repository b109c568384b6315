//! The engine contract shared by workouts and challenges
//!
//! Every engine owns a `SessionClock`. Frames advance the clock by their
//! timestamp first; only frames that arrive while it is active are scored.

use serde::Serialize;

use crate::counting::Phase;
use crate::error::Result;
use crate::pose::Frame;
use crate::session::{ClockEvent, ClockState, CompletionReason, DetectorStatus, SessionClock};
use crate::strike::{Hit, Target};

/// Discrete output of a session, in frame-arrival order
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionEvent {
    Countdown { remaining: u32 },
    Started,
    Completed { reason: CompletionReason },
    PhaseChanged { from: Phase, to: Phase },
    Rep { count: u32 },
    Cue { text: String },
    LeftZone { stage: String, held_ms: f64 },
    StageStarted { stage: String, index: usize },
    FootDropped { dropped: bool },
    TargetPlaced { target: Target },
    Hit {
        limb: String,
        count: u32,
        velocity: f32,
        reaction_ms: Option<f64>,
    },
    DetectorUnavailable { missed_ticks: u32 },
    DetectorRecovered,
}

impl From<ClockEvent> for MotionEvent {
    fn from(event: ClockEvent) -> Self {
        match event {
            ClockEvent::Countdown(remaining) => MotionEvent::Countdown { remaining },
            ClockEvent::Started => MotionEvent::Started,
            ClockEvent::Completed(reason) => MotionEvent::Completed { reason },
        }
    }
}

impl From<DetectorStatus> for MotionEvent {
    fn from(status: DetectorStatus) -> Self {
        match status {
            DetectorStatus::Unavailable { missed_ticks } => MotionEvent::DetectorUnavailable { missed_ticks },
            DetectorStatus::Recovered => MotionEvent::DetectorRecovered,
        }
    }
}

impl From<Hit> for MotionEvent {
    fn from(hit: Hit) -> Self {
        MotionEvent::Hit {
            limb: hit.limb,
            count: hit.count,
            velocity: hit.velocity,
            reaction_ms: hit.reaction_ms,
        }
    }
}

/// Read-only view for the presentation layer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub name: String,
    pub clock: ClockState,
    pub count: u32,
    pub elapsed_ms: f64,
    pub remaining_ms: Option<f64>,
    pub phase: Option<Phase>,
    pub cue: Option<String>,
    pub stage: Option<String>,
    pub held_ms: Option<f64>,
    pub foot_dropped: Option<bool>,
    pub target: Option<Target>,
    pub reaction_ms: Option<f64>,
}

impl Snapshot {
    pub fn new(name: &str, clock: &SessionClock, count: u32, now_ms: f64) -> Self {
        Self {
            name: name.to_string(),
            clock: clock.state(),
            count,
            elapsed_ms: clock.elapsed_ms(now_ms),
            remaining_ms: clock.remaining_ms(now_ms),
            phase: None,
            cue: None,
            stage: None,
            held_ms: None,
            foot_dropped: None,
            target: None,
            reaction_ms: None,
        }
    }
}

pub trait MotionEngine {
    fn name(&self) -> &str;

    fn clock(&self) -> &SessionClock;

    fn clock_mut(&mut self) -> &mut SessionClock;

    /// Zero all counters and per-session state
    fn reset(&mut self);

    /// Score one frame; only called while the clock is active
    fn score_frame(&mut self, frame: &Frame) -> Vec<MotionEvent>;

    /// Headline result: reps, hits or whole seconds held
    fn count(&self) -> u32;

    fn snapshot(&self, now_ms: f64) -> Snapshot;

    /// Reset state and begin the countdown
    fn start(&mut self, now_ms: f64) -> Result<Vec<MotionEvent>> {
        if self.clock().state() == ClockState::Idle {
            self.reset();
        }
        let first = self.clock_mut().start(now_ms)?;
        log::info!("{} starting", self.name());
        Ok(vec![first.into()])
    }

    /// Advance time without a frame (countdown ticks, duration expiry)
    fn advance(&mut self, now_ms: f64) -> Vec<MotionEvent> {
        self.clock_mut()
            .advance(now_ms)
            .into_iter()
            .map(MotionEvent::from)
            .collect()
    }

    fn process(&mut self, frame: &Frame) -> Vec<MotionEvent> {
        let mut events = self.advance(frame.timestamp_ms);
        if self.clock().is_active() {
            events.extend(self.score_frame(frame));
        }
        events
    }

    /// User-initiated finish
    fn finish(&mut self, now_ms: f64) -> Result<Vec<MotionEvent>> {
        let event = self.clock_mut().complete(CompletionReason::Finished, now_ms)?;
        Ok(vec![event.into()])
    }

    /// Complete -> idle, ready to start again; refused mid-session
    fn restart(&mut self) -> Result<()> {
        self.clock_mut().restart()?;
        self.reset();
        Ok(())
    }
}
