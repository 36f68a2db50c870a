//! CSV record buffering
//!
//! JS samples the pipeline at a fixed rate (`record_tick`) and later
//! pulls the whole buffer as a CSV string for file download. Schema:
//! `timestamp,x,y,confidence,blinkFlag,headYaw,headPitch`. The head
//! columns are always empty — no head-pose source exists in this design,
//! the placeholders just keep the schema stable for downstream tooling.

use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use super::gaze::with_pipeline;
use crate::tracking::GazeOutput;

/// CSV header row (schema contract for the exported file)
pub const CSV_HEADER: &str = "timestamp,x,y,confidence,blinkFlag,headYaw,headPitch";

struct RecorderState {
    rows: Vec<String>,
    recording: bool,
}

impl Default for RecorderState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            recording: false,
        }
    }
}

thread_local! {
    static RECORDER: RefCell<RecorderState> = RefCell::new(RecorderState::default());
}

/// Format one CSV row from a pipeline output
///
/// `x`/`y` are empty before the pipeline has produced a point, matching
/// the always-empty head columns.
pub fn format_row(timestamp_ms: f64, out: &GazeOutput) -> String {
    let fmt_coord = |c: Option<f64>| c.map(|v| format!("{:.2}", v)).unwrap_or_default();
    format!(
        "{:.0},{},{},{},{},,",
        timestamp_ms,
        fmt_coord(out.x),
        fmt_coord(out.y),
        out.confidence,
        out.blink,
    )
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

#[wasm_bindgen]
pub fn start_recording() {
    RECORDER.with(|cell| cell.borrow_mut().recording = true);
}

#[wasm_bindgen]
pub fn stop_recording() {
    RECORDER.with(|cell| cell.borrow_mut().recording = false);
}

#[wasm_bindgen]
pub fn is_recording() -> bool {
    RECORDER.with(|cell| cell.borrow().recording)
}

/// Append one row sampled from the current pipeline output
///
/// Called from the JS recording timer; no-op while not recording.
#[wasm_bindgen]
pub fn record_tick() {
    RECORDER.with(|cell| {
        let mut state = cell.borrow_mut();
        if !state.recording {
            return;
        }
        let out = with_pipeline(|p| p.output());
        let row = format_row(js_sys::Date::now(), &out);
        state.rows.push(row);
    });
}

/// Number of buffered rows (for the recording HUD)
#[wasm_bindgen]
pub fn recorded_row_count() -> u32 {
    RECORDER.with(|cell| cell.borrow().rows.len() as u32)
}

/// The whole buffer as a CSV document, header included
#[wasm_bindgen]
pub fn export_csv() -> String {
    RECORDER.with(|cell| {
        let state = cell.borrow();
        let mut csv = String::with_capacity((state.rows.len() + 1) * 48);
        csv.push_str(CSV_HEADER);
        for row in &state.rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv
    })
}

/// Drop all buffered rows
#[wasm_bindgen]
pub fn clear_recording() {
    RECORDER.with(|cell| cell.borrow_mut().rows.clear());
}
