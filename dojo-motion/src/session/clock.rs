//! Session clock: idle -> counting down -> active -> complete
//!
//! Driven by the caller's timestamps. Nothing else in a session scores a
//! frame until the clock reports `Active`.

use serde::Serialize;

use crate::error::{MotionError, Result};

/// Default pre-session countdown
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 3;

const SECOND_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClockState {
    Idle,
    CountingDown { remaining: u32 },
    Active,
    Complete,
}

impl ClockState {
    pub fn name(&self) -> &'static str {
        match self {
            ClockState::Idle => "idle",
            ClockState::CountingDown { .. } => "counting_down",
            ClockState::Active => "active",
            ClockState::Complete => "complete",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Fixed duration ran out
    TimeUp,
    /// User pressed finish
    Finished,
    /// Terminal game event (single hit, all holds done)
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClockEvent {
    Countdown(u32),
    Started,
    Completed(CompletionReason),
}

pub struct SessionClock {
    countdown_seconds: u32,
    duration_ms: Option<f64>,
    state: ClockState,
    next_tick_ms: f64,
    active_since_ms: f64,
    ended_ms: f64,
}

impl SessionClock {
    /// `duration_ms = None` runs until finished or a game event ends it
    pub fn new(countdown_seconds: u32, duration_ms: Option<f64>) -> Self {
        Self {
            countdown_seconds,
            duration_ms,
            state: ClockState::Idle,
            next_tick_ms: 0.0,
            active_since_ms: 0.0,
            ended_ms: 0.0,
        }
    }

    /// Begin the countdown; emits the first number (or `Started` with no countdown)
    pub fn start(&mut self, now_ms: f64) -> Result<ClockEvent> {
        if self.state != ClockState::Idle {
            return Err(MotionError::ClockNotIdle(self.state.name()));
        }
        if self.countdown_seconds == 0 {
            self.activate(now_ms);
            return Ok(ClockEvent::Started);
        }
        self.state = ClockState::CountingDown {
            remaining: self.countdown_seconds,
        };
        self.next_tick_ms = now_ms + SECOND_MS;
        Ok(ClockEvent::Countdown(self.countdown_seconds))
    }

    /// Catch up to `now_ms`, returning every event due in order
    pub fn advance(&mut self, now_ms: f64) -> Vec<ClockEvent> {
        let mut events = Vec::new();

        while let ClockState::CountingDown { remaining } = self.state {
            if now_ms < self.next_tick_ms {
                break;
            }
            let tick_ms = self.next_tick_ms;
            if remaining <= 1 {
                self.activate(tick_ms);
                events.push(ClockEvent::Started);
            } else {
                self.state = ClockState::CountingDown {
                    remaining: remaining - 1,
                };
                self.next_tick_ms = tick_ms + SECOND_MS;
                events.push(ClockEvent::Countdown(remaining - 1));
            }
        }

        if let (ClockState::Active, Some(duration)) = (self.state, self.duration_ms) {
            let expires_ms = self.active_since_ms + duration;
            if now_ms >= expires_ms {
                self.state = ClockState::Complete;
                self.ended_ms = expires_ms;
                events.push(ClockEvent::Completed(CompletionReason::TimeUp));
            }
        }

        events
    }

    /// End an active session early
    pub fn complete(&mut self, reason: CompletionReason, now_ms: f64) -> Result<ClockEvent> {
        if self.state != ClockState::Active {
            return Err(MotionError::SessionNotActive);
        }
        self.state = ClockState::Complete;
        self.ended_ms = now_ms;
        Ok(ClockEvent::Completed(reason))
    }

    /// Complete -> idle, ready for another `start`
    ///
    /// The only backward transition; a running session has to complete first.
    pub fn restart(&mut self) -> Result<()> {
        if self.state != ClockState::Complete {
            return Err(MotionError::ClockNotComplete(self.state.name()));
        }
        self.state = ClockState::Idle;
        Ok(())
    }

    fn activate(&mut self, at_ms: f64) {
        self.state = ClockState::Active;
        self.active_since_ms = at_ms;
        log::info!("session active");
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ClockState::Active
    }

    /// Time spent active, frozen once complete
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.state {
            ClockState::Active => (now_ms - self.active_since_ms).max(0.0),
            ClockState::Complete => (self.ended_ms - self.active_since_ms).max(0.0),
            _ => 0.0,
        }
    }

    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        let duration = self.duration_ms?;
        Some((duration - self.elapsed_ms(now_ms)).max(0.0))
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECONDS, None)
    }
}
