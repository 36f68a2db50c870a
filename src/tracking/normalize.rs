//! Viewport-relative feature normalization
//!
//! Raw gaze coordinates arrive in page pixels; the calibration mapper
//! works in [0,1] feature space so a fitted mapping survives resizes.

/// Map a pixel coordinate into [0,1] feature space
///
/// No clamping here — callers pre-clamp pixels to the viewport bounds.
/// A zero-sized viewport yields a non-finite feature; check
/// `viewport_valid` first and skip mapping for that frame.
pub fn normalize(px: f64, py: f64, vw: f64, vh: f64) -> (f64, f64) {
    (px / vw, py / vh)
}

/// Whether the viewport can produce usable features this frame
pub fn viewport_valid(vw: f64, vh: f64) -> bool {
    vw > 0.0 && vh > 0.0
}
