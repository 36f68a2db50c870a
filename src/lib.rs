//! Gaze Web - browser gaze tracking core
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! JavaScript owns the webcam gaze estimator, rendering, keyboard
//! shortcuts, and the CSV file download; this crate owns calibration,
//! smoothing, confidence gating, and the record buffer.

mod bridge;
pub mod tracking;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::*;

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
}

/// Initialize the tracker - restores any persisted calibration
#[wasm_bindgen]
pub fn init() {
    if bridge::load_saved_mapping() {
        console_log!("Restored calibration mapping from storage");
    } else {
        console_log!("No stored calibration; running in pass-through mode");
    }
}
