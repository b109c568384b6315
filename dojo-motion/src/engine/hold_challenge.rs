//! Multi-stage static holds (e.g. side kick, right leg then left)
//!
//! Leaving a stage's presence band ends that stage. After an unscored
//! switch delay the next stage starts; leaving the last one completes the
//! session.

use crate::counting::{HoldEvent, HoldTimer};
use crate::error::Result;
use crate::pose::Frame;
use crate::session::{CompletionReason, SessionClock};

use super::config::{HoldChallengeConfig, HoldStage};
use super::motion::{MotionEngine, MotionEvent, Snapshot};

pub struct HoldChallengeEngine {
    config: HoldChallengeConfig,
    clock: SessionClock,
    timer: HoldTimer,
    stage: usize,
    /// Held time per finished stage (ms)
    held: Vec<f64>,
    switching_until: Option<f64>,
    foot_dropped: Option<bool>,
}

impl HoldChallengeEngine {
    pub fn new(config: HoldChallengeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            clock: SessionClock::new(config.countdown_seconds, config.duration_ms()),
            timer: HoldTimer::new(config.max_gap_ms),
            stage: 0,
            held: Vec::with_capacity(config.stages.len()),
            switching_until: None,
            foot_dropped: None,
            config,
        })
    }

    fn current_stage(&self) -> &HoldStage {
        &self.config.stages[self.stage.min(self.config.stages.len() - 1)]
    }

    /// Held time of every stage so far, current one included (ms)
    pub fn total_held_ms(&self) -> f64 {
        let finished: f64 = self.held.iter().sum();
        if self.held.len() > self.stage {
            finished
        } else {
            finished + self.timer.held_ms()
        }
    }

    pub fn stage_results(&self) -> &[f64] {
        &self.held
    }

    fn next_stage(&mut self, now_ms: f64) -> Option<MotionEvent> {
        match self.switching_until {
            Some(until) if now_ms >= until => {
                self.switching_until = None;
                self.stage += 1;
                self.timer.reset();
                self.foot_dropped = None;
                let name = self.current_stage().name.clone();
                log::info!("hold stage {} ({}) starting", self.stage, name);
                Some(MotionEvent::StageStarted {
                    stage: name,
                    index: self.stage,
                })
            }
            _ => None,
        }
    }
}

impl MotionEngine for HoldChallengeEngine {
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
        self.timer.reset();
        self.stage = 0;
        self.held.clear();
        self.switching_until = None;
        self.foot_dropped = None;
    }

    fn score_frame(&mut self, frame: &Frame) -> Vec<MotionEvent> {
        let now = frame.timestamp_ms;
        let mut events = Vec::new();

        if self.switching_until.is_some() {
            match self.next_stage(now) {
                Some(started) => events.push(started),
                None => return events,
            }
        }

        let stage = self.current_stage();
        let sample = stage.bands.classify(stage.signal.evaluate(frame));
        let dropped = stage
            .height
            .as_ref()
            .and_then(|check| check.signal.evaluate(frame).map(|h| h < check.min));

        if dropped.is_some() && dropped != self.foot_dropped {
            self.foot_dropped = dropped;
            events.push(MotionEvent::FootDropped {
                dropped: dropped.unwrap_or(false),
            });
        }

        if let Some(HoldEvent::LeftZone { held_ms }) = self.timer.update(sample, now) {
            self.held.push(held_ms);
            events.push(MotionEvent::LeftZone {
                stage: self.current_stage().name.clone(),
                held_ms,
            });

            if self.stage + 1 < self.config.stages.len() {
                self.switching_until = Some(now + self.config.switch_delay_ms);
            } else if let Ok(done) = self.clock.complete(CompletionReason::GameOver, now) {
                events.push(done.into());
            }
        }

        events
    }

    fn count(&self) -> u32 {
        (self.total_held_ms() / 1000.0).floor() as u32
    }

    fn snapshot(&self, now_ms: f64) -> Snapshot {
        let mut snapshot = Snapshot::new(&self.config.name, &self.clock, self.count(), now_ms);
        snapshot.stage = Some(self.current_stage().name.clone());
        snapshot.held_ms = Some(self.timer.held_ms());
        snapshot.foot_dropped = self.foot_dropped;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::HoldStage;
    use crate::pose::*;
    use crate::signal::{Chain, SignalSpec};

    fn config() -> HoldChallengeConfig {
        let knee = |hip: &str, knee: &str, ankle: &str| SignalSpec::JointAngle(Chain::new(hip, knee, ankle));
        HoldChallengeConfig::builder("kick")
            .stage(HoldStage::new("right", knee(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE), 160.0, 145.0))
            .stage(HoldStage::new("left", knee(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE), 160.0, 145.0))
            .switch_delay_ms(2500.0)
            .countdown_seconds(0)
            .build()
            .unwrap()
    }

    /// Leg with the knee bent to `deg`
    fn leg(t: f64, side: &str, deg: f32) -> Frame {
        let (hip, knee, ankle) = match side {
            "right" => (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
            _ => (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
        };
        let r = (180.0 - deg).to_radians();
        Frame::new(
            t,
            vec![
                Keypoint::new(hip, 0.0, 300.0, 0.9),
                Keypoint::new(knee, 100.0, 300.0, 0.9),
                Keypoint::new(ankle, 100.0 + 100.0 * r.cos(), 300.0 - 100.0 * r.sin(), 0.9),
            ],
        )
    }

    #[test]
    fn test_two_stages_then_complete() {
        let mut e = HoldChallengeEngine::new(config()).unwrap();
        e.start(0.0).unwrap();

        let mut t = 0.0;
        for _ in 0..11 {
            e.process(&leg(t, "right", 175.0));
            t += 100.0;
        }
        let left = e.process(&leg(t, "right", 120.0));
        assert!(matches!(left.as_slice(), [MotionEvent::LeftZone { held_ms, .. }] if (*held_ms - 1000.0).abs() < 1e-6));

        // switch delay: frames ignored
        t += 1000.0;
        assert!(e.process(&leg(t, "left", 175.0)).is_empty());

        t += 1600.0;
        let started = e.process(&leg(t, "left", 175.0));
        assert!(matches!(started.first(), Some(MotionEvent::StageStarted { index: 1, .. })));

        for _ in 0..5 {
            t += 100.0;
            e.process(&leg(t, "left", 175.0));
        }
        t += 100.0;
        let done = e.process(&leg(t, "left", 100.0));
        assert!(done.contains(&MotionEvent::Completed {
            reason: CompletionReason::GameOver
        }));
        assert_eq!(e.stage_results().len(), 2);
        assert!((e.total_held_ms() - 1500.0).abs() < 1e-6);
        assert_eq!(e.count(), 1);
    }

    #[test]
    fn test_yellow_band_neither_scores_nor_exits() {
        let mut e = HoldChallengeEngine::new(config()).unwrap();
        e.start(0.0).unwrap();
        e.process(&leg(0.0, "right", 175.0));
        for i in 1..20 {
            assert!(e.process(&leg(i as f64 * 100.0, "right", 150.0)).is_empty());
        }
        assert_eq!(e.total_held_ms(), 0.0);
    }

    #[test]
    fn test_foot_drop_reported_on_change() {
        let cfg = HoldChallengeConfig::builder("kick")
            .stage(
                HoldStage::new(
                    "right",
                    SignalSpec::JointAngle(Chain::new(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE)),
                    160.0,
                    145.0,
                )
                .with_height(
                    SignalSpec::HeightRatio {
                        upper: RIGHT_HIP.into(),
                        lower: RIGHT_ANKLE.into(),
                    },
                    0.6,
                ),
            )
            .countdown_seconds(0)
            .build()
            .unwrap();
        let mut e = HoldChallengeEngine::new(cfg).unwrap();
        e.start(0.0).unwrap();

        // ankle level with the hip: ratio 0, dropped
        let first = e.process(&leg(0.0, "right", 175.0));
        assert!(first.contains(&MotionEvent::FootDropped { dropped: true }));
        assert!(!e.process(&leg(100.0, "right", 175.0)).contains(&MotionEvent::FootDropped { dropped: true }));
        assert_eq!(e.snapshot(100.0).foot_dropped, Some(true));
    }
}
