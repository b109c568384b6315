//! End-to-end scenarios against the public API

use dojo_motion::counting::{HoldTimer, Phase, PhaseConfig, PhaseMachine};
use dojo_motion::engine::{presets, ExerciseConfig, MotionEngine, MotionEvent, SessionRunner, WorkoutEngine};
use dojo_motion::geometry::angle;
use dojo_motion::pose::*;
use dojo_motion::session::{ClockEvent, MemoryStatsStore, SessionClock, SessionResult, StatsStore};
use dojo_motion::signal::{Chain, SignalSpec};
use dojo_motion::strike::{FrameSize, HitConfig, HitDetector, HitShape, Target};
use proptest::prelude::*;

fn kp(name: &str, x: f32, y: f32) -> Keypoint {
    Keypoint::new(name, x, y, 0.95)
}

/// Left arm with the elbow bent to `deg`
fn arm_frame(t: f64, deg: f32) -> Frame {
    let r = (180.0 - deg).to_radians();
    Frame::new(
        t,
        vec![
            kp(LEFT_SHOULDER, 200.0, 100.0),
            kp(LEFT_ELBOW, 200.0, 200.0),
            kp(LEFT_WRIST, 200.0 + 100.0 * r.sin(), 200.0 + 100.0 * r.cos()),
        ],
    )
}

#[test]
fn elbow_sequence_end_to_end() {
    let config = PhaseConfig::builder("elbow").thresholds(90.0, 150.0).build().unwrap();
    let mut machine = PhaseMachine::new(config);
    let signal = SignalSpec::JointAngle(Chain::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST));

    let phases: Vec<Phase> = [170.0, 170.0, 95.0, 80.0, 95.0, 170.0]
        .iter()
        .enumerate()
        .map(|(i, &deg)| {
            let frame = arm_frame(i as f64 * 33.0, deg);
            machine.step(signal.evaluate(&frame), frame.timestamp_ms);
            machine.phase()
        })
        .collect();

    use Phase::*;
    assert_eq!(phases, vec![Up, Up, Up, Down, Down, Up]);
    assert_eq!(machine.reps(), 1);
}

#[test]
fn low_confidence_vertex_is_undefined() {
    let a = Keypoint::new(LEFT_SHOULDER, 0.0, 0.0, 0.9);
    let b = Keypoint::new(LEFT_ELBOW, 0.0, 100.0, 0.1);
    let c = Keypoint::new(LEFT_WRIST, 100.0, 100.0, 0.9);
    assert_eq!(angle(&a, &b, &c), None);
}

#[test]
fn resting_wrist_never_hits() {
    let mut detector = HitDetector::new(&[RIGHT_WRIST], HitConfig::default()).unwrap();
    detector.set_target(Target::new(300.0, 200.0, 40.0, HitShape::Circle), 0.0);
    for i in 0..100 {
        // sub-pixel jitter only
        let jitter = if i % 2 == 0 { 0.0 } else { 0.5 };
        let frame = Frame::new(i as f64 * 33.0, vec![kp(RIGHT_WRIST, 300.0 + jitter, 200.0)]);
        assert!(detector.process(&frame).is_empty());
    }
    assert_eq!(detector.hits(), 0);
}

#[test]
fn hold_left_zone_fires_once() {
    let mut timer = HoldTimer::default();
    let fired: Vec<bool> = [true, true, true, false, false, true, true]
        .iter()
        .enumerate()
        .map(|(i, &z)| timer.update(z, i as f64 * 100.0).is_some())
        .collect();
    assert_eq!(fired, vec![false, false, false, true, false, false, false]);
}

#[test]
fn countdown_then_active_with_no_scoring_before() {
    let mut clock = SessionClock::new(3, None);
    let mut events = vec![clock.start(0.0).unwrap()];
    events.extend(clock.advance(1000.0));
    events.extend(clock.advance(2000.0));
    events.extend(clock.advance(3000.0));
    assert_eq!(
        events,
        vec![
            ClockEvent::Countdown(3),
            ClockEvent::Countdown(2),
            ClockEvent::Countdown(1),
            ClockEvent::Started
        ]
    );

    let config = ExerciseConfig::builder("elbow")
        .signal(SignalSpec::JointAngle(Chain::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST)))
        .thresholds(90.0, 150.0)
        .build()
        .unwrap();
    let mut engine = WorkoutEngine::new(config).unwrap();
    engine.start(0.0).unwrap();
    let mut t = 0.0;
    while t < 3000.0 {
        let deg = if (t as u32 / 100) % 2 == 0 { 170.0 } else { 60.0 };
        let events = engine.process(&arm_frame(t, deg));
        assert!(!events.iter().any(|e| matches!(e, MotionEvent::Rep { .. } | MotionEvent::PhaseChanged { .. })));
        t += 50.0;
    }
    assert_eq!(engine.count(), 0);
}

#[test]
fn pushup_workout_through_runner_persists_stats() {
    let engine = WorkoutEngine::new(presets::pushups().unwrap()).unwrap();
    let mut runner = SessionRunner::new(Box::new(engine), MemoryStatsStore::new(), || "2026-10-19".into());
    runner.start(0.0).unwrap();

    // nose height above the shoulder line: 150 up, 40 down
    let frame = |t: f64, gap: f32| {
        Frame::new(
            t,
            vec![
                kp(NOSE, 320.0, 300.0 - gap),
                kp(LEFT_SHOULDER, 260.0, 300.0),
                kp(RIGHT_SHOULDER, 380.0, 300.0),
            ],
        )
    };

    let mut reps = Vec::new();
    let mut t = 3000.0;
    for _ in 0..4 {
        for gap in [150.0, 40.0, 150.0] {
            let (ticket, _) = runner.begin_tick(t);
            for event in runner.submit(ticket.unwrap().id(), frame(t, gap)) {
                if let MotionEvent::Rep { count } = event {
                    reps.push(count);
                }
            }
            t += 400.0;
        }
    }
    assert_eq!(reps, vec![1, 2, 3, 4]);

    runner.finish(t).unwrap();
    let stats = runner.previous_stats();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.best_session.as_ref().unwrap().count, 4);
}

#[test]
fn stats_best_needs_strictly_more() {
    let mut store = MemoryStatsStore::new();
    for count in [8, 8, 5] {
        store.save_session_result(
            "crunches",
            &SessionResult::new(count, 60, format!("run-{}", count)),
        );
    }
    let stats = store.load_previous_stats("crunches");
    assert_eq!(stats.total_sessions, 3);
    assert_eq!(stats.total_reps, 21);
    assert_eq!(stats.best_session.unwrap().count, 8);
    assert_eq!(stats.last_session.unwrap().count, 5);
}

#[test]
fn presets_build_engines() {
    let size = FrameSize::new(640.0, 480.0).unwrap();
    for name in presets::PRESET_NAMES {
        let engine = presets::by_name(name).unwrap().unwrap().into_engine(size, 3).unwrap();
        assert_eq!(engine.name(), name);
    }
}

proptest! {
    #[test]
    fn angle_symmetric_and_bounded(
        ax in -500.0f32..500.0, ay in -500.0f32..500.0,
        bx in -500.0f32..500.0, by in -500.0f32..500.0,
        cx in -500.0f32..500.0, cy in -500.0f32..500.0,
    ) {
        let a = Keypoint::new(LEFT_SHOULDER, ax, ay, 1.0);
        let b = Keypoint::new(LEFT_ELBOW, bx, by, 1.0);
        let c = Keypoint::new(LEFT_WRIST, cx, cy, 1.0);
        let forward = angle(&a, &b, &c);
        prop_assert_eq!(forward, angle(&c, &b, &a));
        if let Some(deg) = forward {
            prop_assert!((0.0..=180.0).contains(&deg));
        }
    }

    #[test]
    fn oscillating_above_up_threshold_counts_nothing(
        signal in proptest::collection::vec(151.0f32..179.0, 1..300)
    ) {
        let config = PhaseConfig::builder("elbow").thresholds(90.0, 150.0).build().unwrap();
        let mut machine = PhaseMachine::new(config);
        for (i, s) in signal.into_iter().enumerate() {
            prop_assert!(machine.step(Some(s), i as f64 * 33.0).is_none());
        }
        prop_assert_eq!(machine.reps(), 0);
    }
}
