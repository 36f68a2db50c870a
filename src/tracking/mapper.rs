//! Calibration mapping - fit and apply
//!
//! Two independent affine regressions (screen-x and screen-y as
//! functions of the normalized gaze feature), solved exactly via the
//! normal equations. No iteration, no regularization: with at most a
//! handful of samples the closed-form solve is both cheaper and exact.

use serde::{Deserialize, Serialize};

use crate::tracking::linalg::{invert3, Mat3, Vec3};

/// Minimum samples for a well-posed affine fit (3 unknowns per axis)
pub const MIN_SAMPLES: usize = 3;

/// One captured calibration pair: where the estimator said the user was
/// looking (normalized) vs where the target actually was (normalized).
#[derive(Clone, Copy, Debug)]
pub struct CalibrationSample {
    pub feature: (f64, f64),
    pub target: (f64, f64),
}

/// Fitted affine correction, `s = a*fx + b*fy + c` per axis
///
/// Round-trips through JSON for persistence; exactly these six floats
/// are the stored record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearMapping {
    pub bx: [f64; 3],
    pub by: [f64; 3],
}

impl LinearMapping {
    /// Pass-through coefficients: output feature = input feature
    pub fn identity() -> Self {
        Self {
            bx: [1.0, 0.0, 0.0],
            by: [0.0, 1.0, 0.0],
        }
    }
}

/// Result of a fit attempt
///
/// `degenerate` is set when the normal equations were singular (samples
/// without enough geometric spread) and the mapping fell back to
/// identity. The mapping is still installable — it passes features
/// through unscaled — but the caller should tell the user to
/// recalibrate.
#[derive(Clone, Copy, Debug)]
pub struct FitOutcome {
    pub mapping: LinearMapping,
    pub degenerate: bool,
}

/// Fit the mapping from collected samples
///
/// Returns `None` with fewer than `MIN_SAMPLES` samples (ill-posed, the
/// caller must not install anything). Both axes share the same design
/// matrix, so `X^T X` is accumulated once.
pub fn fit(samples: &[CalibrationSample]) -> Option<FitOutcome> {
    if samples.len() < MIN_SAMPLES {
        return None;
    }

    let mut ata = Mat3::zeros();
    let mut atb_x = Vec3::zeros();
    let mut atb_y = Vec3::zeros();

    for s in samples {
        let row = Vec3::new(s.feature.0, s.feature.1, 1.0);
        ata += row * row.transpose();
        atb_x += row * s.target.0;
        atb_y += row * s.target.1;
    }

    match invert3(&ata) {
        Some(inv) => {
            let bx = inv * atb_x;
            let by = inv * atb_y;
            Some(FitOutcome {
                mapping: LinearMapping {
                    bx: [bx[0], bx[1], bx[2]],
                    by: [by[0], by[1], by[2]],
                },
                degenerate: false,
            })
        }
        None => Some(FitOutcome {
            mapping: LinearMapping::identity(),
            degenerate: true,
        }),
    }
}

/// Apply a fitted mapping to a normalized feature
///
/// Evaluates both affine functions, scales back into pixel space, and
/// clamps each axis into the viewport. Pure and constant-time; runs once
/// per estimator event.
pub fn apply(mapping: &LinearMapping, feature: (f64, f64), vw: f64, vh: f64) -> (f64, f64) {
    let (fx, fy) = feature;
    let sx = mapping.bx[0] * fx + mapping.bx[1] * fy + mapping.bx[2];
    let sy = mapping.by[0] * fx + mapping.by[1] * fy + mapping.by[2];
    ((sx * vw).clamp(0.0, vw), (sy * vh).clamp(0.0, vh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::normalize::normalize;
    use crate::tracking::session::DEFAULT_TARGETS;

    fn grid_samples(f: impl Fn((f64, f64)) -> (f64, f64)) -> Vec<CalibrationSample> {
        DEFAULT_TARGETS
            .iter()
            .map(|&t| CalibrationSample {
                feature: f(t),
                target: t,
            })
            .collect()
    }

    #[test]
    fn test_identity_relation_recovers_targets() {
        // feature == target exactly: the fit must reproduce every target
        let samples = grid_samples(|t| t);
        let outcome = fit(&samples).expect("9 samples");
        assert!(!outcome.degenerate);

        for s in &samples {
            let (sx, sy) = apply(&outcome.mapping, s.feature, 1.0, 1.0);
            assert!((sx - s.target.0).abs() < 1e-6, "x: {} vs {}", sx, s.target.0);
            assert!((sy - s.target.1).abs() < 1e-6, "y: {} vs {}", sy, s.target.1);
        }
    }

    #[test]
    fn test_affine_relation_recovers_targets() {
        // Features are a skewed affine image of the targets; the fit
        // must invert that relation exactly.
        let samples = grid_samples(|(tx, ty)| (0.8 * tx + 0.1 * ty + 0.05, -0.2 * tx + 0.9 * ty + 0.1));
        let outcome = fit(&samples).expect("9 samples");
        assert!(!outcome.degenerate);

        for s in &samples {
            let (sx, sy) = apply(&outcome.mapping, s.feature, 1.0, 1.0);
            assert!((sx - s.target.0).abs() < 1e-6);
            assert!((sy - s.target.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        let (vw, vh) = (1280.0, 720.0);
        // Non-collinear so the design matrix has full rank
        let pixels = [(64.0, 36.0), (640.0, 600.0), (1216.0, 100.0)];
        let samples: Vec<CalibrationSample> = pixels
            .iter()
            .map(|&(px, py)| {
                let f = normalize(px, py, vw, vh);
                CalibrationSample {
                    feature: f,
                    target: f,
                }
            })
            .collect();

        let outcome = fit(&samples).expect("3 samples");
        assert!(!outcome.degenerate);
        for &(px, py) in &pixels {
            let (sx, sy) = apply(&outcome.mapping, normalize(px, py, vw, vh), vw, vh);
            assert!((sx - px).abs() < 1e-6);
            assert!((sy - py).abs() < 1e-6);
        }
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let samples = [
            CalibrationSample {
                feature: (0.1, 0.1),
                target: (0.1, 0.1),
            },
            CalibrationSample {
                feature: (0.9, 0.9),
                target: (0.9, 0.9),
            },
        ];
        assert!(fit(&samples).is_none());
    }

    #[test]
    fn test_collinear_samples_fall_back_to_identity() {
        // All features on one line: X^T X is singular. The fallback must
        // be the finite identity mapping, never a fault or NaN.
        let samples: Vec<CalibrationSample> = (0..5)
            .map(|i| {
                let t = i as f64 / 4.0;
                CalibrationSample {
                    feature: (t, t),
                    target: (t, 1.0 - t),
                }
            })
            .collect();

        let outcome = fit(&samples).expect("5 samples");
        assert!(outcome.degenerate);
        assert_eq!(outcome.mapping, LinearMapping::identity());
        for c in outcome.mapping.bx.iter().chain(outcome.mapping.by.iter()) {
            assert!(c.is_finite());
        }
    }

    #[test]
    fn test_apply_clamps_to_viewport() {
        let mapping = LinearMapping {
            bx: [2.0, 0.0, 0.0], // overshoots past the right edge
            by: [0.0, 1.0, -0.5], // undershoots above the top edge
        };
        let (sx, sy) = apply(&mapping, (0.9, 0.1), 1280.0, 720.0);
        assert_eq!(sx, 1280.0);
        assert_eq!(sy, 0.0);
    }

    #[test]
    fn test_mapping_serialization_round_trip() {
        let samples = grid_samples(|(tx, ty)| (0.7 * tx + 0.05, 0.7 * ty + 0.1));
        let mapping = fit(&samples).unwrap().mapping;

        let json = serde_json::to_string(&mapping).unwrap();
        let restored: LinearMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping, restored);
    }
}
