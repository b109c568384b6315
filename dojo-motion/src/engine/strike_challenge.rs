//! Strike challenges: timed punch-outs and single-shot reaction rounds

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::pose::Frame;
use crate::session::{CompletionReason, SessionClock};
use crate::strike::{FrameSize, HitDetector, TargetPlacement};

use super::config::StrikeChallengeConfig;
use super::motion::{MotionEngine, MotionEvent, Snapshot};

pub struct StrikeChallengeEngine {
    name: String,
    clock: SessionClock,
    detector: HitDetector,
    placement: TargetPlacement,
    frame_size: FrameSize,
    rng: SmallRng,
    reaction_ms: Option<f64>,
}

impl StrikeChallengeEngine {
    pub fn new(config: StrikeChallengeConfig, frame_size: FrameSize, seed: u64) -> Result<Self> {
        config.validate()?;
        let limbs: Vec<&str> = config.limbs.iter().map(String::as_str).collect();
        Ok(Self {
            clock: SessionClock::new(config.countdown_seconds, config.duration_ms()),
            detector: HitDetector::new(&limbs, config.hit.clone())?,
            placement: config.placement,
            name: config.name,
            frame_size,
            rng: SmallRng::seed_from_u64(seed),
            reaction_ms: None,
        })
    }

    pub fn set_frame_size(&mut self, frame_size: FrameSize) {
        self.frame_size = frame_size;
    }

    pub fn hits(&self) -> u32 {
        self.detector.hits()
    }

    pub fn reaction_ms(&self) -> Option<f64> {
        self.reaction_ms
    }
}

impl MotionEngine for StrikeChallengeEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&self) -> &SessionClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut SessionClock {
        &mut self.clock
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.reaction_ms = None;
    }

    fn score_frame(&mut self, frame: &Frame) -> Vec<MotionEvent> {
        let mut events = Vec::new();

        // placed on the first live frame so the anchor reflects the pose at activation
        if self.detector.target().is_none() {
            let target = self.placement.place(frame, self.frame_size, &mut self.rng);
            self.detector.set_target(target, frame.timestamp_ms);
            events.push(MotionEvent::TargetPlaced { target });
        }

        for hit in self.detector.process(frame) {
            if hit.reaction_ms.is_some() {
                self.reaction_ms = hit.reaction_ms;
            }
            events.push(hit.into());
        }

        if self.detector.is_finished() {
            if let Ok(done) = self.clock.complete(CompletionReason::GameOver, frame.timestamp_ms) {
                events.push(done.into());
            }
        }

        events
    }

    fn count(&self) -> u32 {
        self.detector.hits()
    }

    fn snapshot(&self, now_ms: f64) -> Snapshot {
        let mut snapshot = Snapshot::new(&self.name, &self.clock, self.count(), now_ms);
        snapshot.target = self.detector.target().copied();
        snapshot.reaction_ms = self.reaction_ms;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::presets;
    use crate::pose::*;

    fn wrist_at(t: f64, x: f32, y: f32) -> Frame {
        Frame::new(
            t,
            vec![
                Keypoint::new(RIGHT_WRIST, x, y, 0.9),
                Keypoint::new(RIGHT_SHOULDER, 320.0, 200.0, 0.9),
            ],
        )
    }

    fn size() -> FrameSize {
        FrameSize::new(640.0, 480.0).unwrap()
    }

    #[test]
    fn test_timed_punches_until_time_up() {
        let mut e = StrikeChallengeEngine::new(presets::max_punches().unwrap(), size(), 1).unwrap();
        e.start(0.0).unwrap();

        // paddle lands on the resting wrist at activation
        let placed = e.process(&wrist_at(3000.0, 500.0, 150.0));
        assert!(placed.contains(&MotionEvent::TargetPlaced {
            target: crate::strike::Target::new(500.0, 150.0, 40.0, crate::strike::HitShape::Square)
        }));

        let mut t = 3000.0;
        for _ in 0..3 {
            t += 100.0;
            e.process(&wrist_at(t, 300.0, 150.0));
            t += 30.0;
            e.process(&wrist_at(t, 500.0, 150.0));
        }
        assert_eq!(e.hits(), 3);

        let end = e.process(&wrist_at(33_000.0, 300.0, 150.0));
        assert!(end.contains(&MotionEvent::Completed {
            reason: CompletionReason::TimeUp
        }));
        e.process(&wrist_at(33_030.0, 500.0, 150.0));
        assert_eq!(e.hits(), 3);
    }

    #[test]
    fn test_reaction_round_ends_on_first_hit() {
        let mut e = StrikeChallengeEngine::new(presets::vipers_reflexes().unwrap(), size(), 9).unwrap();
        e.start(0.0).unwrap();
        e.advance(5000.0);
        assert!(e.clock().is_active());

        e.process(&wrist_at(5000.0, 320.0, 400.0));
        let target = e.snapshot(5000.0).target.unwrap();
        // halfway between the shoulder and either edge
        assert!((target.x - 180.0).abs() < 1e-3 || (target.x - 460.0).abs() < 1e-3);

        e.process(&wrist_at(5300.0, target.x, 400.0));
        let events = e.process(&wrist_at(5320.0, target.x, target.y));
        assert!(events.contains(&MotionEvent::Completed {
            reason: CompletionReason::GameOver
        }));
        assert_eq!(e.reaction_ms(), Some(320.0));
        assert_eq!(e.count(), 1);
    }
}
