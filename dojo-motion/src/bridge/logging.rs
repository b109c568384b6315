//! Browser logging setup

use wasm_bindgen::prelude::*;

fn parse_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

/// Route `log` output to the browser console
///
/// `level` is one of "trace", "debug", "info", "warn", "error"; anything
/// else means "info". Calling twice keeps the first logger.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let level = parse_level(level);
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("dojo-motion logging at {}", level);
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
