//! Rep-counting workouts (pushups, crunches, jumping jacks, ...)

use crate::counting::{FeedbackCoach, PhaseMachine};
use crate::error::Result;
use crate::pose::Frame;
use crate::session::SessionClock;

use super::config::ExerciseConfig;
use super::motion::{MotionEngine, MotionEvent, Snapshot};

pub struct WorkoutEngine {
    config: ExerciseConfig,
    clock: SessionClock,
    machine: PhaseMachine,
    coach: Option<FeedbackCoach>,
}

impl WorkoutEngine {
    pub fn new(config: ExerciseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock: SessionClock::new(config.countdown_seconds, config.duration_ms()),
            machine: PhaseMachine::new(config.phases.clone()),
            coach: config.feedback.clone().map(FeedbackCoach::new),
            config,
        })
    }

    pub fn reps(&self) -> u32 {
        self.machine.reps()
    }
}

impl MotionEngine for WorkoutEngine {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn clock(&self) -> &SessionClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut SessionClock {
        &mut self.clock
    }

    fn reset(&mut self) {
        self.machine.reset();
        if let Some(coach) = self.coach.as_mut() {
            coach.reset();
        }
    }

    fn score_frame(&mut self, frame: &Frame) -> Vec<MotionEvent> {
        let mut events = Vec::new();
        let guard_ok = self.config.guard.check(frame);
        let signal = self.config.signal.evaluate(frame);

        if guard_ok {
            if let Some(transition) = self.machine.step(signal, frame.timestamp_ms) {
                events.push(MotionEvent::PhaseChanged {
                    from: transition.from,
                    to: transition.to,
                });
                if let Some(count) = transition.rep {
                    events.push(MotionEvent::Rep { count });
                }
            }
        }

        if let Some(coach) = self.coach.as_mut() {
            let cue = coach.assess(
                self.machine.config(),
                self.machine.phase(),
                self.machine.reps(),
                guard_ok,
                signal,
            );
            if let Some(text) = cue {
                events.push(MotionEvent::Cue { text });
            }
        }

        events
    }

    fn count(&self) -> u32 {
        self.machine.reps()
    }

    fn snapshot(&self, now_ms: f64) -> Snapshot {
        let mut snapshot = Snapshot::new(&self.config.name, &self.clock, self.count(), now_ms);
        snapshot.phase = Some(self.machine.phase());
        snapshot.cue = self.coach.as_ref().and_then(|c| c.current()).map(str::to_string);
        snapshot
    }
}
