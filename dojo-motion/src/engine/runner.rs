//! Session runner: ties an engine to tick scheduling, detector health,
//! stats persistence and the camera lease
//!
//! `stop` is final. A stopped runner drops late results, refuses to start
//! again and never saves; the host builds a new runner for the next session.

use crate::error::{MotionError, Result};
use crate::pose::Frame;
use crate::session::{
    CameraLease, ClockState, DetectorMonitor, PreviousStats, SessionResult, StatsStore, TickLoop, TickStart,
    TickTicket, DEFAULT_DETECTION_TIMEOUT_MS,
};

use super::motion::{MotionEngine, MotionEvent, Snapshot};

pub struct SessionRunner<S: StatsStore> {
    engine: Box<dyn MotionEngine>,
    ticks: TickLoop,
    monitor: DetectorMonitor,
    store: S,
    date: Box<dyn Fn() -> String>,
    previous: PreviousStats,
    saved: bool,
    camera: Option<CameraLease>,
}

impl<S: StatsStore> SessionRunner<S> {
    /// `date` stamps saved results
    pub fn new(engine: Box<dyn MotionEngine>, store: S, date: impl Fn() -> String + 'static) -> Self {
        let previous = store.load_previous_stats(engine.name());
        Self {
            engine,
            ticks: TickLoop::new(DEFAULT_DETECTION_TIMEOUT_MS),
            monitor: DetectorMonitor::default(),
            store,
            date: Box::new(date),
            previous,
            saved: false,
            camera: None,
        }
    }

    pub fn with_monitor(mut self, monitor: DetectorMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_detection_timeout(mut self, timeout_ms: f64) -> Self {
        self.ticks = TickLoop::new(timeout_ms);
        self
    }

    /// Hold the camera for this session; it is stopped on completion, on
    /// `stop` and when the runner is dropped
    pub fn with_camera(mut self, lease: CameraLease) -> Self {
        self.camera = Some(lease);
        self
    }

    pub fn holds_camera(&self) -> bool {
        self.camera.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.ticks.token().is_cancelled()
    }

    /// Begin the countdown, restarting first if the last run completed
    pub fn start(&mut self, now_ms: f64) -> Result<Vec<MotionEvent>> {
        if self.is_stopped() {
            return Err(MotionError::SessionStopped);
        }
        match self.engine.clock().state() {
            ClockState::Idle => {}
            ClockState::Complete => self.engine.restart()?,
            running => return Err(MotionError::ClockNotIdle(running.name())),
        }
        self.saved = false;
        self.monitor.reset();
        self.engine.start(now_ms)
    }

    /// Ask to run the detector this frame
    ///
    /// `None` while a detection is in flight or after `stop`. A detection
    /// abandoned for timing out counts as a tick with nothing detected.
    pub fn begin_tick(&mut self, now_ms: f64) -> (Option<TickTicket>, Vec<MotionEvent>) {
        match self.ticks.begin(now_ms) {
            TickStart::Issued(ticket) => (Some(ticket), Vec::new()),
            TickStart::Replaced { issued, .. } => {
                let events = self.monitor.observe(false).map(MotionEvent::from).into_iter().collect();
                (Some(issued), events)
            }
            TickStart::Busy | TickStart::Cancelled => (None, Vec::new()),
        }
    }

    /// Hand back a finished detection; stale or cancelled results are dropped
    pub fn submit(&mut self, ticket_id: u32, frame: Frame) -> Vec<MotionEvent> {
        if self.is_stopped() || !self.ticks.complete(ticket_id) {
            return Vec::new();
        }
        let mut events: Vec<MotionEvent> = self.monitor.observe(!frame.is_empty()).map(MotionEvent::from).into_iter().collect();
        events.extend(self.engine.process(&frame));
        self.persist_if_complete(frame.timestamp_ms);
        events
    }

    /// The detector threw; recorded as a tick with nothing detected
    pub fn fail(&mut self, ticket_id: u32, now_ms: f64) -> Vec<MotionEvent> {
        if self.is_stopped() || !self.ticks.complete(ticket_id) {
            return Vec::new();
        }
        let mut events: Vec<MotionEvent> = self.monitor.observe(false).map(MotionEvent::from).into_iter().collect();
        events.extend(self.advance(now_ms));
        events
    }

    pub fn advance(&mut self, now_ms: f64) -> Vec<MotionEvent> {
        if self.is_stopped() {
            return Vec::new();
        }
        let events = self.engine.advance(now_ms);
        self.persist_if_complete(now_ms);
        events
    }

    pub fn finish(&mut self, now_ms: f64) -> Result<Vec<MotionEvent>> {
        if self.is_stopped() {
            return Err(MotionError::SessionStopped);
        }
        let events = self.engine.finish(now_ms)?;
        self.persist_if_complete(now_ms);
        Ok(events)
    }

    /// Cancel scheduling and release the camera; in-flight results are
    /// discarded on arrival and the session state stays as it was
    pub fn stop(&mut self) {
        self.ticks.stop();
        self.camera = None;
        log::info!("{} stopped", self.engine.name());
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        self.engine.snapshot(now_ms)
    }

    pub fn previous_stats(&self) -> &PreviousStats {
        &self.previous
    }

    pub fn engine(&self) -> &dyn MotionEngine {
        self.engine.as_ref()
    }

    fn persist_if_complete(&mut self, now_ms: f64) {
        if self.saved || self.is_stopped() || self.engine.clock().state() != ClockState::Complete {
            return;
        }
        let seconds = (self.engine.clock().elapsed_ms(now_ms) / 1000.0).round() as u32;
        let result = SessionResult::new(self.engine.count(), seconds, (self.date)());
        self.store.save_session_result(self.engine.name(), &result);
        self.previous.record(&result);
        self.saved = true;
        self.camera = None;
        log::info!("{} complete: {} in {}s", self.engine.name(), result.count, seconds);
    }
}
