//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod calibration;
mod gaze;
mod recorder;
mod storage;

pub use gaze::{
    // WASM entry points
    update_gaze,
    update_gaze_lost,
    get_gaze_point,
    get_confidence,
    is_blinking,
    set_smoothing_alpha,
    get_smoothing_alpha,
    reset_pipeline,
};

pub use calibration::{
    start_calibration,
    start_calibration_with_targets,
    capture_calibration_point,
    abort_calibration,
    is_calibration_active,
    get_calibration_target,
    get_calibration_progress,
    has_mapping,
    clear_mapping,
    load_saved_mapping,
    // Capture status codes
    CAPTURE_INACTIVE,
    CAPTURE_DROPPED,
    CAPTURE_ADVANCED,
    CAPTURE_COMPLETED,
    CAPTURE_COMPLETED_DEGENERATE,
};

pub use recorder::{
    start_recording,
    stop_recording,
    is_recording,
    record_tick,
    recorded_row_count,
    export_csv,
    clear_recording,
    CSV_HEADER,
};

pub use storage::{load_mapping, save_mapping, STORAGE_KEY};
