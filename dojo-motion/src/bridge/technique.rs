//! Technique recognition for pose-prompt challenges
//!
//! Stateless: each call reads one detector result, independent of any
//! running session.

use wasm_bindgen::prelude::*;

use crate::error::MotionError;
use crate::signal::{self, Technique};

use super::session::decode_frame;

/// Name of the technique shown in `poses` (e.g. "left_punch"), or `undefined`
#[wasm_bindgen(js_name = recognizeTechnique)]
pub fn recognize_technique(poses: JsValue) -> Result<Option<String>, JsValue> {
    let frame = decode_frame(poses, 0.0)?;
    Ok(signal::recognize(&frame).map(|t| t.as_str().to_string()))
}

/// Whether `poses` shows the named technique
#[wasm_bindgen(js_name = matchesTechnique)]
pub fn matches_technique(name: &str, poses: JsValue) -> Result<bool, JsValue> {
    let technique = Technique::from_name(name).ok_or_else(|| MotionError::UnknownTechnique(name.to_string()))?;
    let frame = decode_frame(poses, 0.0)?;
    Ok(technique.matches(&frame))
}

#[wasm_bindgen(js_name = listTechniques)]
pub fn list_techniques() -> Vec<String> {
    Technique::ALL.iter().map(|t| t.as_str().to_string()).collect()
}
