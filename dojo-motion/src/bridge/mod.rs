//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod logging;
mod session;
mod storage;
mod technique;

pub use logging::{get_version, init_logging};
pub use session::{
    advance_session, begin_tick, finish_session, get_previous_stats, get_snapshot, list_presets,
    report_detector_error, start_session, stop_session, submit_detections,
};
pub use storage::LocalStorageStats;
pub use technique::{list_techniques, matches_technique, recognize_technique};
