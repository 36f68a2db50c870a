//! Tracking module - calibration mapping and the streaming gaze pipeline
//!
//! Re-exports only. All logic in submodules.

pub mod linalg;
pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod session;

pub use mapper::{apply, fit, CalibrationSample, FitOutcome, LinearMapping, MIN_SAMPLES};
pub use normalize::{normalize, viewport_valid};
pub use pipeline::{
    GazeOutput, GazePipeline, BLINK_THRESHOLD, DEFAULT_ALPHA, EDGE_CONFIDENCE, FULL_CONFIDENCE,
};
pub use session::{CalibrationSession, CaptureOutcome, DEFAULT_TARGETS};
