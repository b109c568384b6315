//! Session entry points for JavaScript
//!
//! The host's per-frame loop calls `beginTick`, runs the pose detector when
//! it gets a ticket, then hands the poses back with `submitDetections`.
//! One session lives in thread-local state (WASM is single-threaded), and
//! so does the camera slot it leases from.

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::engine::{presets, SessionConfig, SessionRunner};
use crate::error::MotionError;
use crate::pose::{Frame, Pose};
use crate::session::{CameraLease, SourceSlot, VideoSource};
use crate::strike::FrameSize;

use super::storage::LocalStorageStats;

type Runner = SessionRunner<LocalStorageStats>;

thread_local! {
    static SESSION: RefCell<Option<Runner>> = RefCell::new(None);
    static CAMERA: SourceSlot = SourceSlot::new();
}

/// Camera stream owned by the page; stopping it calls back into JS
struct JsCamera {
    stop: js_sys::Function,
}

impl VideoSource for JsCamera {
    fn stop(&mut self) {
        if let Err(err) = self.stop.call0(&JsValue::NULL) {
            log::warn!("camera stop callback failed: {:?}", err);
        }
    }
}

fn lease_camera(stop: js_sys::Function) -> Result<CameraLease, MotionError> {
    let camera: Box<dyn VideoSource> = Box::new(JsCamera { stop });
    CAMERA.with(|slot| slot.lease(camera))
}

#[derive(Serialize)]
struct TickReply<T: Serialize> {
    ticket: Option<u32>,
    events: T,
}

fn with_session<T>(f: impl FnOnce(&mut Runner) -> Result<T, MotionError>) -> Result<T, MotionError> {
    SESSION.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => Err(MotionError::SessionNotActive),
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn resolve_config(preset_or_json: &str) -> Result<SessionConfig, MotionError> {
    match presets::by_name(preset_or_json.trim()) {
        Some(config) => config,
        None => SessionConfig::from_json(preset_or_json),
    }
}

/// Detector output as a frame; `undefined`/`null` means nobody in view
pub(super) fn decode_frame(poses: JsValue, timestamp_ms: f64) -> Result<Frame, MotionError> {
    let poses: Vec<Pose> = if poses.is_undefined() || poses.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(poses)?
    };
    Ok(Frame::from_detections(timestamp_ms, poses))
}

fn today() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start a session from a preset name (e.g. "pushups") or a JSON config.
/// Any running session is stopped first. Returns the first events.
///
/// `stop_camera`, when given, is called exactly once when the session ends,
/// is stopped, or fails to start.
#[wasm_bindgen(js_name = startSession)]
pub fn start_session(
    preset_or_json: &str,
    width: f32,
    height: f32,
    now_ms: f64,
    stop_camera: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    stop_session();

    let camera = stop_camera.map(lease_camera).transpose()?;
    let config = resolve_config(preset_or_json)?;
    let engine = config.into_engine(FrameSize::new(width, height)?, random_seed())?;
    let mut runner = SessionRunner::new(engine, LocalStorageStats, today);
    if let Some(camera) = camera {
        runner = runner.with_camera(camera);
    }
    let events = runner.start(now_ms)?;

    SESSION.with(|cell| *cell.borrow_mut() = Some(runner));
    to_js(&events)
}

/// `{ ticket, events }`; run the detector only when `ticket` is set
#[wasm_bindgen(js_name = beginTick)]
pub fn begin_tick(now_ms: f64) -> Result<JsValue, JsValue> {
    let (ticket, events) = with_session(|runner| Ok(runner.begin_tick(now_ms)))?;
    to_js(&TickReply {
        ticket: ticket.map(|t| t.id()),
        events,
    })
}

/// Hand back the detector's poses for a ticket. An empty array is a
/// valid "nobody in view" result.
#[wasm_bindgen(js_name = submitDetections)]
pub fn submit_detections(ticket: u32, poses: JsValue, timestamp_ms: f64) -> Result<JsValue, JsValue> {
    let frame = decode_frame(poses, timestamp_ms)?;
    let events = with_session(|runner| Ok(runner.submit(ticket, frame)))?;
    to_js(&events)
}

/// The detector threw for this ticket
#[wasm_bindgen(js_name = reportDetectorError)]
pub fn report_detector_error(ticket: u32, now_ms: f64) -> Result<JsValue, JsValue> {
    let events = with_session(|runner| Ok(runner.fail(ticket, now_ms)))?;
    to_js(&events)
}

/// Advance countdown and duration without a frame
#[wasm_bindgen(js_name = advanceSession)]
pub fn advance_session(now_ms: f64) -> Result<JsValue, JsValue> {
    let events = with_session(|runner| Ok(runner.advance(now_ms)))?;
    to_js(&events)
}

#[wasm_bindgen(js_name = finishSession)]
pub fn finish_session(now_ms: f64) -> Result<JsValue, JsValue> {
    let events = with_session(|runner| runner.finish(now_ms))?;
    to_js(&events)
}

/// Cancel scheduling, release the camera and drop the session. Safe to call
/// at any time.
#[wasm_bindgen(js_name = stopSession)]
pub fn stop_session() {
    SESSION.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.stop();
        }
    });
}

#[wasm_bindgen(js_name = getSnapshot)]
pub fn get_snapshot(now_ms: f64) -> Result<JsValue, JsValue> {
    let snapshot = with_session(|runner| Ok(runner.snapshot(now_ms)))?;
    to_js(&snapshot)
}

/// Last/best record loaded when the session started
#[wasm_bindgen(js_name = getPreviousStats)]
pub fn get_previous_stats() -> Result<JsValue, JsValue> {
    let stats = with_session(|runner| Ok(runner.previous_stats().clone()))?;
    to_js(&stats)
}

#[wasm_bindgen(js_name = listPresets)]
pub fn list_presets() -> Result<JsValue, JsValue> {
    to_js(&presets::PRESET_NAMES)
}
