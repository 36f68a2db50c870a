//! Small fixed-size linear algebra for the calibration solve
//!
//! nalgebra handles transpose/multiply; the 3x3 inverse is written out
//! via the adjugate so the singular case degrades the way the mapper
//! documents instead of whatever `try_inverse` decides.

use nalgebra::{Matrix3, Vector3};

/// 3x3 matrix type (normal equations)
pub type Mat3 = Matrix3<f64>;
/// 3-element vector type (affine coefficients)
pub type Vec3 = Vector3<f64>;

/// Determinant magnitude below which the system is treated as singular
pub const SINGULAR_EPS: f64 = 1e-8;

/// Closed-form 3x3 inverse via the adjugate
///
/// Returns `None` when `|det| < SINGULAR_EPS` — the caller decides what
/// a singular system means (the mapper falls back to an identity
/// mapping).
pub fn invert3(m: &Mat3) -> Option<Mat3> {
    // Cofactors of the first row give the determinant by expansion
    let c00 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    let c01 = m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)];
    let c02 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];

    let det = m[(0, 0)] * c00 + m[(0, 1)] * c01 + m[(0, 2)] * c02;
    if det.abs() < SINGULAR_EPS {
        return None;
    }

    let inv_det = 1.0 / det;

    // Adjugate = transposed cofactor matrix
    Some(Mat3::new(
        c00 * inv_det,
        (m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)]) * inv_det,
        (m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)]) * inv_det,
        c01 * inv_det,
        (m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)]) * inv_det,
        (m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)]) * inv_det,
        c02 * inv_det,
        (m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)]) * inv_det,
        (m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]) * inv_det,
    ))
}
