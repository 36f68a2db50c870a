//! Streaming gaze pipeline
//!
//! Runs once per incoming estimator event: confidence estimation,
//! calibration mapping (when installed), exponential smoothing, and the
//! blink flag. Push-driven — the estimator fires at its own irregular
//! cadence and each event is processed to completion before the next.

use crate::tracking::mapper::{self, LinearMapping};
use crate::tracking::normalize::{normalize, viewport_valid};

/// Confidence when the raw point is strictly inside the viewport
pub const FULL_CONFIDENCE: f64 = 1.0;
/// Confidence when the estimator reports an edge/out-of-bounds point —
/// a fixed proxy for "probably noise", not a probability
pub const EDGE_CONFIDENCE: f64 = 0.2;
/// Blink threshold over confidence. Approximation: there is no eyelid
/// signal, so low positional confidence doubles as the blink flag.
pub const BLINK_THRESHOLD: f64 = 0.35;
/// Startup smoothing factor (fraction retained from the previous
/// filtered value; higher = smoother, more lag). Live-tunable.
pub const DEFAULT_ALPHA: f64 = 0.6;

/// Display-ready pipeline output for one event
///
/// `x`/`y` stay `None` until the first usable candidate arrives.
/// Confidence only ever takes the values 0, 0.2, and 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct GazeOutput {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub confidence: f64,
    pub blink: bool,
}

/// Per-stream mutable state: the single "latest known point"
pub struct GazePipeline {
    filtered: Option<(f64, f64)>,
    confidence: f64,
    blink: bool,
    alpha: f64,
    mapping: Option<LinearMapping>,
}

impl GazePipeline {
    pub fn new() -> Self {
        Self {
            filtered: None,
            confidence: 0.0,
            blink: false,
            alpha: DEFAULT_ALPHA,
            mapping: None,
        }
    }

    /// Process one raw estimator event
    ///
    /// `sample` is `None` when the estimator lost the face. Viewport
    /// dimensions are read fresh by the caller for every event — they
    /// must not be cached across events.
    pub fn process(&mut self, sample: Option<(f64, f64)>, vw: f64, vh: f64) -> GazeOutput {
        let (rx, ry) = match sample {
            Some(p) => p,
            None => {
                // Dropout: freeze the last-known-good point rather than
                // snapping to the origin.
                self.blink = true;
                self.confidence = 0.0;
                return self.output();
            }
        };

        let candidate = if viewport_valid(vw, vh) {
            // Strict interior check happens on the pre-clamp coordinate.
            self.confidence = if rx > 0.0 && rx < vw && ry > 0.0 && ry < vh {
                FULL_CONFIDENCE
            } else {
                EDGE_CONFIDENCE
            };

            let cx = rx.clamp(0.0, vw);
            let cy = ry.clamp(0.0, vh);

            match &self.mapping {
                Some(m) => mapper::apply(m, normalize(cx, cy, vw, vh), vw, vh),
                // Pass-through mode: useful before any calibration.
                None => (cx, cy),
            }
        } else {
            // Degenerate viewport: normalization would produce NaN, so
            // skip the mapping step and propagate the raw point.
            self.confidence = EDGE_CONFIDENCE;
            (rx, ry)
        };

        self.filtered = Some(match self.filtered {
            // First candidate is taken verbatim — smoothing from an
            // arbitrary origin would drift the cursor across the screen
            // on startup.
            None => candidate,
            Some((px, py)) => (
                px + (1.0 - self.alpha) * (candidate.0 - px),
                py + (1.0 - self.alpha) * (candidate.1 - py),
            ),
        });

        self.blink = self.confidence < BLINK_THRESHOLD;
        self.output()
    }

    /// Latest output without processing a new event
    pub fn output(&self) -> GazeOutput {
        GazeOutput {
            x: self.filtered.map(|p| p.0),
            y: self.filtered.map(|p| p.1),
            confidence: self.confidence,
            blink: self.blink,
        }
    }

    /// Latest smoothed point, if any event has produced one
    pub fn filtered(&self) -> Option<(f64, f64)> {
        self.filtered
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn install_mapping(&mut self, mapping: LinearMapping) {
        self.mapping = Some(mapping);
    }

    pub fn clear_mapping(&mut self) {
        self.mapping = None;
    }

    pub fn mapping(&self) -> Option<&LinearMapping> {
        self.mapping.as_ref()
    }

    /// Explicit reset of the filter state (mapping survives)
    pub fn reset(&mut self) {
        self.filtered = None;
        self.confidence = 0.0;
        self.blink = false;
    }
}

impl Default for GazePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VW: f64 = 1280.0;
    const VH: f64 = 720.0;

    #[test]
    fn test_first_sample_taken_verbatim() {
        let mut p = GazePipeline::new();
        p.set_alpha(0.9); // heavy smoothing must not lag the cold start
        let out = p.process(Some((100.0, 50.0)), VW, VH);
        assert_eq!(out.x, Some(100.0));
        assert_eq!(out.y, Some(50.0));
    }

    #[test]
    fn test_alpha_zero_passes_candidates_through() {
        let mut p = GazePipeline::new();
        p.set_alpha(0.0);
        p.process(Some((100.0, 100.0)), VW, VH);
        let out = p.process(Some((700.0, 300.0)), VW, VH);
        assert_eq!(out.x, Some(700.0));
        assert_eq!(out.y, Some(300.0));
    }

    #[test]
    fn test_high_alpha_monotonic_no_overshoot() {
        let mut p = GazePipeline::new();
        p.set_alpha(0.9);
        p.process(Some((100.0, 100.0)), VW, VH);

        // Repeatedly feed a fixed new candidate: the filtered x must
        // approach it monotonically and never pass it (plain lerp, not
        // a spring).
        let mut prev = 100.0;
        for _ in 0..50 {
            let out = p.process(Some((900.0, 100.0)), VW, VH);
            let x = out.x.unwrap();
            assert!(x > prev, "filtered x must increase: {} -> {}", prev, x);
            assert!(x < 900.0, "filtered x must not overshoot: {}", x);
            prev = x;
        }
        // And it converges.
        assert!((900.0 - prev) < 800.0 * 0.9f64.powi(49) + 1e-6);
    }

    #[test]
    fn test_confidence_interior_and_exterior() {
        let mut p = GazePipeline::new();

        let out = p.process(Some((640.0, 360.0)), VW, VH);
        assert_eq!(out.confidence, FULL_CONFIDENCE);
        assert!(!out.blink);

        let out = p.process(Some((-5.0, 360.0)), VW, VH);
        assert_eq!(out.confidence, EDGE_CONFIDENCE);
        assert!(out.blink);

        // Boundary points are not strictly interior.
        let out = p.process(Some((0.0, 360.0)), VW, VH);
        assert_eq!(out.confidence, EDGE_CONFIDENCE);
        let out = p.process(Some((640.0, VH)), VW, VH);
        assert_eq!(out.confidence, EDGE_CONFIDENCE);
    }

    #[test]
    fn test_blink_iff_confidence_below_threshold() {
        let mut p = GazePipeline::new();
        let out = p.process(Some((640.0, 360.0)), VW, VH);
        assert!(out.confidence >= BLINK_THRESHOLD && !out.blink);
        let out = p.process(Some((2000.0, 360.0)), VW, VH);
        assert!(out.confidence < BLINK_THRESHOLD && out.blink);
        let out = p.process(None, VW, VH);
        assert!(out.confidence < BLINK_THRESHOLD && out.blink);
    }

    #[test]
    fn test_out_of_bounds_point_is_clamped() {
        let mut p = GazePipeline::new();
        p.set_alpha(0.0);
        let out = p.process(Some((1500.0, -20.0)), VW, VH);
        assert_eq!(out.x, Some(VW));
        assert_eq!(out.y, Some(0.0));
    }

    #[test]
    fn test_dropout_freezes_point_and_zeroes_confidence() {
        let mut p = GazePipeline::new();
        p.process(Some((400.0, 200.0)), VW, VH);

        let out = p.process(None, VW, VH);
        assert_eq!(out.x, Some(400.0));
        assert_eq!(out.y, Some(200.0));
        assert_eq!(out.confidence, 0.0);
        assert!(out.blink);
    }

    #[test]
    fn test_dropout_before_any_point() {
        let mut p = GazePipeline::new();
        let out = p.process(None, VW, VH);
        assert!(out.x.is_none() && out.y.is_none());
        assert_eq!(out.confidence, 0.0);
        assert!(out.blink);
    }

    #[test]
    fn test_mapping_applied_when_installed() {
        let mut p = GazePipeline::new();
        p.set_alpha(0.0);
        // Shift everything right by 10% of the viewport.
        p.install_mapping(LinearMapping {
            bx: [1.0, 0.0, 0.1],
            by: [0.0, 1.0, 0.0],
        });

        let out = p.process(Some((640.0, 360.0)), VW, VH);
        assert!((out.x.unwrap() - (640.0 + 0.1 * VW)).abs() < 1e-9);
        assert!((out.y.unwrap() - 360.0).abs() < 1e-9);

        p.clear_mapping();
        let out = p.process(Some((640.0, 360.0)), VW, VH);
        assert_eq!(out.x, Some(640.0));
    }

    #[test]
    fn test_degenerate_viewport_passes_raw_point() {
        let mut p = GazePipeline::new();
        p.install_mapping(LinearMapping::identity());

        let out = p.process(Some((123.0, 45.0)), 0.0, 0.0);
        assert_eq!(out.x, Some(123.0));
        assert_eq!(out.y, Some(45.0));
        assert_eq!(out.confidence, EDGE_CONFIDENCE);
        assert!(out.x.unwrap().is_finite() && out.y.unwrap().is_finite());
    }

    #[test]
    fn test_reset_clears_filter_but_not_mapping() {
        let mut p = GazePipeline::new();
        p.install_mapping(LinearMapping::identity());
        p.process(Some((100.0, 100.0)), VW, VH);

        p.reset();
        assert!(p.filtered().is_none());
        assert!(p.mapping().is_some());
    }

    #[test]
    fn test_alpha_is_clamped() {
        let mut p = GazePipeline::new();
        p.set_alpha(1.5);
        assert_eq!(p.alpha(), 1.0);
        p.set_alpha(-0.2);
        assert_eq!(p.alpha(), 0.0);
    }
}
