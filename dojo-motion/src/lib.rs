//! Dojo Motion - real-time motion analysis for workouts and challenges
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen start hook
//!
//! Pose keypoints flow one way per frame:
//! pose -> geometry/signal -> counting/strike -> engine events.

pub mod bridge;
pub mod counting;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod session;
pub mod signal;
pub mod strike;

use wasm_bindgen::prelude::*;

pub use engine::{MotionEngine, MotionEvent, SessionConfig, SessionRunner, Snapshot};
pub use error::{MotionError, Result};
pub use pose::{Frame, Keypoint, Pose};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    console_log!("dojo-motion {} loaded", env!("CARGO_PKG_VERSION"));
}
