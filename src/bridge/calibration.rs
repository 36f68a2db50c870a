//! Calibration session control
//!
//! JS drives the session: it draws the current target, waits for the
//! user to confirm their gaze is on it, and calls the capture trigger.
//! On completion the fitted mapping is installed into the pipeline and
//! persisted fire-and-forget.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use super::gaze::{viewport_size, with_pipeline};
use super::storage;
use crate::tracking::{
    normalize, viewport_valid, CalibrationSession, CaptureOutcome, DEFAULT_TARGETS,
};

// Capture trigger status codes reported to JS
/// No session is running
pub const CAPTURE_INACTIVE: u32 = 0;
/// Pipeline had no usable point; still on the same target
pub const CAPTURE_DROPPED: u32 = 1;
/// Sample stored, next target is up
pub const CAPTURE_ADVANCED: u32 = 2;
/// Sequence finished, mapping fitted and installed
pub const CAPTURE_COMPLETED: u32 = 3;
/// Sequence finished but the fit was degenerate (identity fallback
/// installed) — the UI should prompt for a recalibration with more
/// varied gaze positions
pub const CAPTURE_COMPLETED_DEGENERATE: u32 = 4;

thread_local! {
    static SESSION: RefCell<CalibrationSession> = RefCell::new(CalibrationSession::new());
}

fn with_session<R>(f: impl FnOnce(&mut CalibrationSession) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Start a session over the default 9-point grid
#[wasm_bindgen]
pub fn start_calibration() {
    with_session(|s| s.start(DEFAULT_TARGETS.to_vec()));
}

/// Start a session over a caller-supplied target sequence
///
/// `data` is flat `[x0, y0, x1, y1, ...]` in viewport fractions. Odd
/// lengths and sequences of fewer than 3 points are rejected.
#[wasm_bindgen]
pub fn start_calibration_with_targets(data: &[f64]) -> bool {
    if data.len() % 2 != 0 || data.len() < 6 {
        web_sys::console::warn_1(
            &format!("Invalid target data length: {} (need >= 6, even)", data.len()).into(),
        );
        return false;
    }

    let targets: Vec<(f64, f64)> = data.chunks(2).map(|c| (c[0], c[1])).collect();
    with_session(|s| s.start(targets))
}

/// Capture trigger: pair the current smoothed point with the current
/// target. Returns one of the `CAPTURE_*` status codes.
#[wasm_bindgen]
pub fn capture_calibration_point() -> u32 {
    // The session samples in normalized feature space so the fitted
    // mapping is viewport-independent. A point captured against a
    // degenerate viewport would be non-finite, so it counts as no point.
    let (vw, vh) = viewport_size();
    let feature = with_pipeline(|p| p.filtered()).and_then(|(x, y)| {
        if viewport_valid(vw, vh) {
            Some(normalize(x, y, vw, vh))
        } else {
            None
        }
    });

    match with_session(|s| s.capture(feature)) {
        CaptureOutcome::Inactive => CAPTURE_INACTIVE,
        CaptureOutcome::NoPoint => CAPTURE_DROPPED,
        CaptureOutcome::Advanced { .. } => CAPTURE_ADVANCED,
        CaptureOutcome::Completed { fit } => match fit {
            Some(outcome) => {
                with_pipeline(|p| p.install_mapping(outcome.mapping));
                storage::save_mapping(&outcome.mapping);
                if outcome.degenerate {
                    web_sys::console::warn_1(
                        &"Calibration fit was degenerate; installed pass-through mapping".into(),
                    );
                    CAPTURE_COMPLETED_DEGENERATE
                } else {
                    CAPTURE_COMPLETED
                }
            }
            // Under 3 samples at completion cannot happen with a valid
            // target set; leave the existing mapping alone if it does.
            None => CAPTURE_COMPLETED_DEGENERATE,
        },
    }
}

/// Abandon the session; partial samples are discarded and the installed
/// mapping is untouched
#[wasm_bindgen]
pub fn abort_calibration() {
    with_session(|s| s.abort());
}

#[wasm_bindgen]
pub fn is_calibration_active() -> bool {
    with_session(|s| s.is_active())
}

/// Current target as `[x, y]` viewport fractions, `None` when idle
#[wasm_bindgen]
pub fn get_calibration_target() -> Option<Vec<f64>> {
    with_session(|s| s.current_target().map(|(x, y)| vec![x, y]))
}

/// Session progress as `[captured, total]`
#[wasm_bindgen]
pub fn get_calibration_progress() -> Vec<u32> {
    let (done, total) = with_session(|s| s.progress());
    vec![done as u32, total as u32]
}

/// Whether the pipeline currently has a calibration mapping installed
#[wasm_bindgen]
pub fn has_mapping() -> bool {
    with_pipeline(|p| p.mapping().is_some())
}

/// Drop the installed mapping and its persisted record (back to
/// pass-through mode)
#[wasm_bindgen]
pub fn clear_mapping() {
    with_pipeline(|p| p.clear_mapping());
    storage::clear_stored_mapping();
}

/// Load a previously persisted mapping into the pipeline
///
/// Returns whether a mapping was installed. Missing or corrupt records
/// just leave the pipeline uncalibrated.
#[wasm_bindgen]
pub fn load_saved_mapping() -> bool {
    match storage::load_mapping() {
        Some(mapping) => {
            with_pipeline(|p| p.install_mapping(mapping));
            true
        }
        None => false,
    }
}
