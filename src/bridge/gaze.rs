//! Gaze event ingestion and output surface
//!
//! Receives raw estimator events from JavaScript and runs the streaming
//! pipeline; the renderer and recorder read the latest output from here.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use crate::tracking::GazePipeline;

// Thread-local storage (WASM is single-threaded); every event is
// processed to completion before the next is accepted.
thread_local! {
    static PIPELINE: RefCell<GazePipeline> = RefCell::new(GazePipeline::new());
}

/// Run a closure against the shared pipeline (for the calibration and
/// recorder bridges)
pub(crate) fn with_pipeline<R>(f: impl FnOnce(&mut GazePipeline) -> R) -> R {
    PIPELINE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Current viewport size in pixels, queried fresh per event
///
/// Resize can happen between any two events, so this is never cached.
/// No window (or an unreadable size) reports a degenerate viewport and
/// the pipeline skips mapping for that frame.
pub(crate) fn viewport_size() -> (f64, f64) {
    match web_sys::window() {
        Some(w) => {
            let vw = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let vh = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            (vw, vh)
        }
        None => (0.0, 0.0),
    }
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called from JavaScript with one raw estimator prediction
/// (page pixel coordinates)
#[wasm_bindgen]
pub fn update_gaze(x: f64, y: f64) {
    if !x.is_finite() || !y.is_finite() {
        web_sys::console::warn_1(
            &format!("Dropping non-finite gaze sample: ({}, {})", x, y).into(),
        );
        return;
    }

    let (vw, vh) = viewport_size();
    with_pipeline(|p| {
        p.process(Some((x, y)), vw, vh);
    });
}

/// Called from JavaScript when the estimator reports no face
#[wasm_bindgen]
pub fn update_gaze_lost() {
    let (vw, vh) = viewport_size();
    with_pipeline(|p| {
        p.process(None, vw, vh);
    });
}

/// Latest smoothed, calibrated point as `[x, y]` in page pixels
///
/// `None` until the first usable event has been processed.
#[wasm_bindgen]
pub fn get_gaze_point() -> Option<Vec<f64>> {
    with_pipeline(|p| p.filtered().map(|(x, y)| vec![x, y]))
}

/// Confidence of the latest event: 0.0, 0.2, or 1.0
#[wasm_bindgen]
pub fn get_confidence() -> f64 {
    with_pipeline(|p| p.output().confidence)
}

/// Blink flag of the latest event (confidence-derived approximation)
#[wasm_bindgen]
pub fn is_blinking() -> bool {
    with_pipeline(|p| p.output().blink)
}

/// Tune the smoothing factor live (clamped into [0, 1])
#[wasm_bindgen]
pub fn set_smoothing_alpha(alpha: f64) {
    with_pipeline(|p| p.set_alpha(alpha));
}

#[wasm_bindgen]
pub fn get_smoothing_alpha() -> f64 {
    with_pipeline(|p| p.alpha())
}

/// Explicitly reset the filter state (the installed mapping survives)
#[wasm_bindgen]
pub fn reset_pipeline() {
    with_pipeline(|p| p.reset());
}
