//! Dense 2x2 complex matrices and the standard gate matrices.
//!
//! Rotation matrices follow the `exp(-i·θ/2·σ)` convention throughout; the
//! Fourier-transform helpers and phase estimation depend on it.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::ops::Mul;

use crate::error::{QsvError, Result};
use crate::math::{COMPLEX_ALMOST_EQ_TOLERANCE, MATRIX_SQRT_TOLERANCE};

/// Complex number type alias for readability.
pub type C64 = Complex64;

/// Create a complex number from real and imaginary parts.
#[inline]
pub const fn c(re: f64, im: f64) -> C64 {
    C64::new(re, im)
}

/// Complex zero.
pub const ZERO: C64 = C64::new(0.0, 0.0);

/// Complex one.
pub const ONE: C64 = C64::new(1.0, 0.0);

/// Imaginary unit i.
pub const IMAG: C64 = C64::new(0.0, 1.0);

/// A dense 2x2 complex matrix.
///
/// This is the value type carried by U and CU gate elements, and the working
/// type of the gate-decomposition routines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix2x2 {
    pub elem00: C64,
    pub elem01: C64,
    pub elem10: C64,
    pub elem11: C64,
}

impl Matrix2x2 {
    /// Creates a matrix from its row-major entries.
    pub const fn new(elem00: C64, elem01: C64, elem10: C64, elem11: C64) -> Self {
        Self {
            elem00,
            elem01,
            elem10,
            elem11,
        }
    }

    /// Returns the conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self {
            elem00: self.elem00.conj(),
            elem01: self.elem10.conj(),
            elem10: self.elem01.conj(),
            elem11: self.elem11.conj(),
        }
    }

    /// Returns the determinant.
    pub fn determinant(&self) -> C64 {
        self.elem00 * self.elem11 - self.elem01 * self.elem10
    }

    /// Returns the trace.
    pub fn trace(&self) -> C64 {
        self.elem00 + self.elem11
    }

    /// Entrywise approximate equality within `tolerance`.
    pub fn almost_eq_with_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        (self.elem00 - other.elem00).norm() < tolerance
            && (self.elem01 - other.elem01).norm() < tolerance
            && (self.elem10 - other.elem10).norm() < tolerance
            && (self.elem11 - other.elem11).norm() < tolerance
    }

    /// Entrywise approximate equality at the default tolerance.
    pub fn almost_eq(&self, other: &Self) -> bool {
        self.almost_eq_with_tolerance(other, COMPLEX_ALMOST_EQ_TOLERANCE)
    }

    /// Computes the principal square root.
    ///
    /// Uses the closed form `(M + s·I) / t` with `s = det(M)^{1/2}` and
    /// `t = (tr(M) + 2s)^{1/2}`. When `tr(M) + 2s` vanishes the closed form
    /// is singular, and the root is computed by eigendecomposition instead.
    pub fn sqrt_matrix(&self) -> Result<Self> {
        let s = self.determinant().sqrt();
        let denom_sq = self.trace() + 2.0 * s;

        if denom_sq.norm() < MATRIX_SQRT_TOLERANCE {
            return self.sqrt_by_eigendecomposition_();
        }

        let t = denom_sq.sqrt();
        Ok(Self {
            elem00: (self.elem00 + s) / t,
            elem01: self.elem01 / t,
            elem10: self.elem10 / t,
            elem11: (self.elem11 + s) / t,
        })
    }

    fn sqrt_by_eigendecomposition_(&self) -> Result<Self> {
        // diagonal matrices take the entrywise principal root
        if self.elem01.norm() < MATRIX_SQRT_TOLERANCE && self.elem10.norm() < MATRIX_SQRT_TOLERANCE
        {
            return Ok(Self {
                elem00: self.elem00.sqrt(),
                elem01: ZERO,
                elem10: ZERO,
                elem11: self.elem11.sqrt(),
            });
        }

        let half_trace = 0.5 * self.trace();
        let discriminant = (half_trace * half_trace - self.determinant()).sqrt();
        let lambda0 = half_trace + discriminant;
        let lambda1 = half_trace - discriminant;

        let eigenvector = |lambda: C64| -> (C64, C64) {
            if self.elem01.norm() > MATRIX_SQRT_TOLERANCE {
                (self.elem01, lambda - self.elem00)
            } else if self.elem10.norm() > MATRIX_SQRT_TOLERANCE {
                (lambda - self.elem11, self.elem10)
            } else if (lambda - self.elem00).norm() < MATRIX_SQRT_TOLERANCE {
                (ONE, ZERO)
            } else {
                (ZERO, ONE)
            }
        };

        let (v00, v10) = eigenvector(lambda0);
        let (v01, v11) = eigenvector(lambda1);

        let det_p = v00 * v11 - v01 * v10;
        if det_p.norm() < MATRIX_SQRT_TOLERANCE {
            return Err(QsvError::decomposition(
                "degenerate eigenvector system in 2x2 matrix square root",
            ));
        }

        let (s0, s1) = (lambda0.sqrt(), lambda1.sqrt());

        // P * diag(s0, s1) * P^{-1}
        Ok(Self {
            elem00: (v00 * s0 * v11 - v01 * s1 * v10) / det_p,
            elem01: (v01 * v00 * (s1 - s0)) / det_p,
            elem10: (v10 * v11 * (s0 - s1)) / det_p,
            elem11: (v11 * s1 * v00 - v10 * s0 * v01) / det_p,
        })
    }
}

impl Mul for Matrix2x2 {
    type Output = Matrix2x2;

    fn mul(self, rhs: Matrix2x2) -> Matrix2x2 {
        Matrix2x2 {
            elem00: self.elem00 * rhs.elem00 + self.elem01 * rhs.elem10,
            elem01: self.elem00 * rhs.elem01 + self.elem01 * rhs.elem11,
            elem10: self.elem10 * rhs.elem00 + self.elem11 * rhs.elem10,
            elem11: self.elem10 * rhs.elem01 + self.elem11 * rhs.elem11,
        }
    }
}

impl Mul<Matrix2x2> for C64 {
    type Output = Matrix2x2;

    fn mul(self, rhs: Matrix2x2) -> Matrix2x2 {
        Matrix2x2 {
            elem00: self * rhs.elem00,
            elem01: self * rhs.elem01,
            elem10: self * rhs.elem10,
            elem11: self * rhs.elem11,
        }
    }
}

/// The standard single-qubit gate matrices.
pub mod gates {
    use super::*;

    /// 1/√2 as a complex number.
    const FRAC_1_SQRT_2_C: C64 = C64::new(FRAC_1_SQRT_2, 0.0);

    /// Identity matrix.
    pub const IDENTITY: Matrix2x2 = Matrix2x2::new(ONE, ZERO, ZERO, ONE);

    /// Hadamard gate.
    pub const H: Matrix2x2 = Matrix2x2::new(
        FRAC_1_SQRT_2_C,
        FRAC_1_SQRT_2_C,
        FRAC_1_SQRT_2_C,
        C64::new(-FRAC_1_SQRT_2, 0.0),
    );

    /// Pauli-X (NOT) gate.
    pub const X: Matrix2x2 = Matrix2x2::new(ZERO, ONE, ONE, ZERO);

    /// Pauli-Y gate.
    pub const Y: Matrix2x2 = Matrix2x2::new(ZERO, C64::new(0.0, -1.0), IMAG, ZERO);

    /// Pauli-Z gate.
    pub const Z: Matrix2x2 = Matrix2x2::new(ONE, ZERO, ZERO, C64::new(-1.0, 0.0));

    /// S gate (√Z).
    pub const S: Matrix2x2 = Matrix2x2::new(ONE, ZERO, ZERO, IMAG);

    /// S† gate.
    pub const SDAG: Matrix2x2 = Matrix2x2::new(ONE, ZERO, ZERO, C64::new(0.0, -1.0));

    /// T gate (π/8 gate).
    pub const T: Matrix2x2 =
        Matrix2x2::new(ONE, ZERO, ZERO, C64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2));

    /// T† gate.
    pub const TDAG: Matrix2x2 =
        Matrix2x2::new(ONE, ZERO, ZERO, C64::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2));

    /// √X gate.
    pub const SX: Matrix2x2 = Matrix2x2::new(
        C64::new(0.5, 0.5),
        C64::new(0.5, -0.5),
        C64::new(0.5, -0.5),
        C64::new(0.5, 0.5),
    );

    /// √X† gate.
    pub const SXDAG: Matrix2x2 = Matrix2x2::new(
        C64::new(0.5, -0.5),
        C64::new(0.5, 0.5),
        C64::new(0.5, 0.5),
        C64::new(0.5, -0.5),
    );

    /// Computes Rx(θ) = cos(θ/2)·I - i·sin(θ/2)·X.
    pub fn rx(theta: f64) -> Matrix2x2 {
        let cos = (theta / 2.0).cos();
        let sin = (theta / 2.0).sin();
        Matrix2x2::new(c(cos, 0.0), c(0.0, -sin), c(0.0, -sin), c(cos, 0.0))
    }

    /// Computes Ry(θ) = cos(θ/2)·I - i·sin(θ/2)·Y.
    pub fn ry(theta: f64) -> Matrix2x2 {
        let cos = (theta / 2.0).cos();
        let sin = (theta / 2.0).sin();
        Matrix2x2::new(c(cos, 0.0), c(-sin, 0.0), c(sin, 0.0), c(cos, 0.0))
    }

    /// Computes Rz(θ) = diag(e^{-iθ/2}, e^{+iθ/2}).
    pub fn rz(theta: f64) -> Matrix2x2 {
        Matrix2x2::new(
            C64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            C64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Computes P(θ) = diag(1, e^{iθ}).
    pub fn p(theta: f64) -> Matrix2x2 {
        Matrix2x2::new(ONE, ZERO, ZERO, C64::from_polar(1.0, theta))
    }
}

#[cfg(test)]
mod tests {
    use super::gates::*;
    use super::*;
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1.0e-10;

    #[test]
    fn test_multiply_identity() {
        let m = gates::rx(0.7);
        assert!((IDENTITY * m).almost_eq_with_tolerance(&m, TOLERANCE));
        assert!((m * IDENTITY).almost_eq_with_tolerance(&m, TOLERANCE));
    }

    #[test]
    fn test_pauli_products() {
        // XY = iZ
        let xy = X * Y;
        let iz = IMAG * Z;
        assert!(xy.almost_eq_with_tolerance(&iz, TOLERANCE));

        // HH = I
        assert!((H * H).almost_eq_with_tolerance(&IDENTITY, TOLERANCE));
    }

    #[test]
    fn test_adjoint_unitarity() {
        for m in [H, X, Y, Z, S, T, SX, gates::rx(0.3), gates::p(1.1)] {
            let product = m * m.adjoint();
            assert!(product.almost_eq_with_tolerance(&IDENTITY, TOLERANCE));
        }
    }

    #[test]
    fn test_dagger_constants() {
        assert!(S.adjoint().almost_eq_with_tolerance(&SDAG, TOLERANCE));
        assert!(T.adjoint().almost_eq_with_tolerance(&TDAG, TOLERANCE));
        assert!(SX.adjoint().almost_eq_with_tolerance(&SXDAG, TOLERANCE));
    }

    #[test]
    fn test_sqrt_of_x_is_sx() {
        let root = X.sqrt_matrix().unwrap();
        assert!((root * root).almost_eq_with_tolerance(&X, TOLERANCE));
        assert!(root.almost_eq_with_tolerance(&SX, TOLERANCE));
    }

    #[test]
    fn test_sqrt_of_z_is_s() {
        let root = Z.sqrt_matrix().unwrap();
        assert!((root * root).almost_eq_with_tolerance(&Z, TOLERANCE));
        assert!(root.almost_eq_with_tolerance(&S, TOLERANCE));
    }

    #[test]
    fn test_sqrt_squares_back() {
        for m in [H, Y, gates::rx(0.9), gates::ry(2.1), gates::p(0.4)] {
            let root = m.sqrt_matrix().unwrap();
            assert!((root * root).almost_eq_with_tolerance(&m, 1.0e-8));
        }
    }

    #[test]
    fn test_sqrt_eigendecomposition_branch() {
        // trace + 2·sqrt(det) = 0 for -I, forcing the fallback
        let minus_identity = Matrix2x2::new(-ONE, ZERO, ZERO, -ONE);
        let root = minus_identity.sqrt_matrix().unwrap();
        assert!((root * root).almost_eq_with_tolerance(&minus_identity, 1.0e-8));

        // -Rx(θ) for small θ is nearly degenerate with off-diagonal entries
        let near_minus_identity = c(-1.0, 0.0) * gates::rx(1.0e-3);
        let root = near_minus_identity.sqrt_matrix().unwrap();
        assert!((root * root).almost_eq_with_tolerance(&near_minus_identity, 1.0e-8));
    }

    #[test]
    fn test_rotation_convention() {
        // Rz(π) = diag(-i, i)
        let m = gates::rz(PI);
        assert!(almost_eq(m.elem00, c(0.0, -1.0)));
        assert!(almost_eq(m.elem11, c(0.0, 1.0)));

        // P(π/2) = S
        assert!(gates::p(PI / 2.0).almost_eq_with_tolerance(&S, TOLERANCE));
    }

    fn almost_eq(left: C64, right: C64) -> bool {
        (left - right).norm() < TOLERANCE
    }
}
