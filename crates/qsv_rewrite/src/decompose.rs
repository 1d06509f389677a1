//! Decomposition of 2x2 unitaries into primitive gates.
//!
//! A matrix is first matched against the recognizable primitives
//! {H, X, Y, Z, SX, RX(θ), RY(θ), RZ(θ), P(θ)}. Anything else falls back to
//! the universal ZYZ form `U = e^{iα}·RZ(β)·RY(γ)·RZ(δ)`; the controlled
//! variant uses the ABC pattern with two CX gates.

use num_complex::Complex64;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::COMPLEX_ALMOST_EQ_TOLERANCE;
use qsv_core::matrix::{gates, Matrix2x2};
use qsv_core::types::{Gate, GateInfo};

/// A primitive gate recognized inside a 2x2 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Recognized {
    Fixed(Gate),
    Angled(Gate, f64),
}

fn recognize_primitive_(matrix: &Matrix2x2, tolerance: f64) -> Option<Recognized> {
    const FIXED: [(Gate, Matrix2x2); 5] = [
        (Gate::H, gates::H),
        (Gate::X, gates::X),
        (Gate::Y, gates::Y),
        (Gate::Z, gates::Z),
        (Gate::SX, gates::SX),
    ];

    for (gate, candidate) in FIXED {
        if matrix.almost_eq_with_tolerance(&candidate, tolerance) {
            return Some(Recognized::Fixed(gate));
        }
    }

    // angle kinds: derive the candidate angle from the entries, then verify
    let p_angle = matrix.elem11.arg();
    if matrix.almost_eq_with_tolerance(&gates::p(p_angle), tolerance) {
        return Some(Recognized::Angled(Gate::P, p_angle));
    }

    let rz_angle = 2.0 * matrix.elem11.arg();
    if matrix.almost_eq_with_tolerance(&gates::rz(rz_angle), tolerance) {
        return Some(Recognized::Angled(Gate::RZ, rz_angle));
    }

    let rx_angle = 2.0 * f64::atan2(-matrix.elem01.im, matrix.elem00.re);
    if matrix.almost_eq_with_tolerance(&gates::rx(rx_angle), tolerance) {
        return Some(Recognized::Angled(Gate::RX, rx_angle));
    }

    let ry_angle = 2.0 * f64::atan2(matrix.elem10.re, matrix.elem00.re);
    if matrix.almost_eq_with_tolerance(&gates::ry(ry_angle), tolerance) {
        return Some(Recognized::Angled(Gate::RY, ry_angle));
    }

    None
}

/// ZYZ Euler angles `(α, β, γ, δ)` with `U = e^{iα}·RZ(β)·RY(γ)·RZ(δ)`.
fn zyz_angles_(matrix: &Matrix2x2) -> Result<(f64, f64, f64, f64)> {
    let determinant = matrix.determinant();
    if (determinant.norm() - 1.0).abs() > 1.0e-6 {
        return Err(QsvError::decomposition(format!(
            "matrix is not unitary: |det| = {}",
            determinant.norm()
        )));
    }

    let alpha = 0.5 * determinant.arg();
    let special = Complex64::from_polar(1.0, -alpha);
    let v00 = special * matrix.elem00;
    let v10 = special * matrix.elem10;

    let gamma = 2.0 * f64::atan2(v10.norm(), v00.norm());

    let beta_plus_delta = if v00.norm() > 1.0e-9 { -2.0 * v00.arg() } else { 0.0 };
    let beta_minus_delta = if v10.norm() > 1.0e-9 { 2.0 * v10.arg() } else { 0.0 };

    let beta = 0.5 * (beta_plus_delta + beta_minus_delta);
    let delta = 0.5 * (beta_plus_delta - beta_minus_delta);

    Ok((alpha, beta, gamma, delta))
}

/// Decomposes a single-qubit matrix on `target` into primitive gates.
///
/// Recognized matrices become one gate; the rest expand to the ZYZ chain
/// followed by an RZ/P pair realizing the global phase.
pub fn decompose_single_qubit_matrix(
    target: usize,
    matrix: &Matrix2x2,
    tolerance: f64,
) -> Result<Vec<GateInfo>> {
    if let Some(recognized) = recognize_primitive_(matrix, tolerance) {
        return Ok(vec![match recognized {
            Recognized::Fixed(gate) => GateInfo::one_target(gate, target),
            Recognized::Angled(gate, angle) => {
                GateInfo::one_target_one_angle(gate, target, angle)
            }
        }]);
    }

    let (alpha, beta, gamma, delta) = zyz_angles_(matrix)?;

    let mut decomposition = vec![
        GateInfo::one_target_one_angle(Gate::RZ, target, delta),
        GateInfo::one_target_one_angle(Gate::RY, target, gamma),
        GateInfo::one_target_one_angle(Gate::RZ, target, beta),
    ];
    if alpha.abs() > tolerance {
        decomposition.push(GateInfo::one_target_one_angle(Gate::RZ, target, -2.0 * alpha));
        decomposition.push(GateInfo::one_target_one_angle(Gate::P, target, 2.0 * alpha));
    }

    Ok(decomposition)
}

/// Decomposes a controlled 2x2 matrix into primitive gates.
///
/// Recognized matrices map to their controlled primitive; the rest expand
/// to the ABC pattern `C · CX · B · CX · A` on the target plus a P(α) on
/// the control.
pub fn decompose_controlled_matrix(
    control: usize,
    target: usize,
    matrix: &Matrix2x2,
    tolerance: f64,
) -> Result<Vec<GateInfo>> {
    if let Some(recognized) = recognize_primitive_(matrix, tolerance) {
        return Ok(vec![match recognized {
            Recognized::Fixed(gate) => GateInfo::one_control_one_target(
                gate.controlled().expect("recognized gates lift"),
                control,
                target,
            ),
            Recognized::Angled(gate, angle) => GateInfo::one_control_one_target_one_angle(
                gate.controlled().expect("recognized gates lift"),
                control,
                target,
                angle,
            ),
        }]);
    }

    let (alpha, beta, gamma, delta) = zyz_angles_(matrix)?;

    let mut decomposition = vec![
        // C = RZ((δ-β)/2)
        GateInfo::one_target_one_angle(Gate::RZ, target, 0.5 * (delta - beta)),
        GateInfo::one_control_one_target(Gate::CX, control, target),
        // B = RZ(-(δ+β)/2) then RY(-γ/2)
        GateInfo::one_target_one_angle(Gate::RZ, target, -0.5 * (delta + beta)),
        GateInfo::one_target_one_angle(Gate::RY, target, -0.5 * gamma),
        GateInfo::one_control_one_target(Gate::CX, control, target),
        // A = RY(γ/2) then RZ(β)
        GateInfo::one_target_one_angle(Gate::RY, target, 0.5 * gamma),
        GateInfo::one_target_one_angle(Gate::RZ, target, beta),
    ];
    if alpha.abs() > tolerance {
        decomposition.push(GateInfo::one_target_one_angle(Gate::P, control, alpha));
    }

    Ok(decomposition)
}

/// The default recognition tolerance.
pub const DECOMPOSITION_TOLERANCE: f64 = COMPLEX_ALMOST_EQ_TOLERANCE;

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::matrix::{c, ONE, ZERO};

    fn reconstruct_single(gates_list: &[GateInfo]) -> Matrix2x2 {
        let mut total = gates::IDENTITY;
        for info in gates_list {
            let matrix = match info.gate {
                Gate::U | Gate::CU | Gate::M => unreachable!("primitive decomposition"),
                gate => gate.target_matrix(info.angle).unwrap(),
            };
            // circuit order applies left-to-right, so later gates multiply on the left
            total = matrix * total;
        }
        total
    }

    #[test]
    fn test_recognizes_fixed_gates() {
        for (gate, matrix) in [
            (Gate::H, gates::H),
            (Gate::X, gates::X),
            (Gate::Y, gates::Y),
            (Gate::Z, gates::Z),
            (Gate::SX, gates::SX),
        ] {
            let decomposition =
                decompose_single_qubit_matrix(0, &matrix, DECOMPOSITION_TOLERANCE).unwrap();
            assert_eq!(decomposition.len(), 1);
            assert_eq!(decomposition[0].gate, gate);
        }
    }

    #[test]
    fn test_recognizes_rotations() {
        let decomposition =
            decompose_single_qubit_matrix(0, &gates::rx(0.8), DECOMPOSITION_TOLERANCE).unwrap();
        assert_eq!(decomposition.len(), 1);
        assert_eq!(decomposition[0].gate, Gate::RX);
        assert!((decomposition[0].angle - 0.8).abs() < 1.0e-9);

        let decomposition =
            decompose_single_qubit_matrix(0, &gates::p(1.3), DECOMPOSITION_TOLERANCE).unwrap();
        assert_eq!(decomposition[0].gate, Gate::P);
        assert!((decomposition[0].angle - 1.3).abs() < 1.0e-9);
    }

    #[test]
    fn test_zyz_reconstructs_generic_unitary() {
        // a dense unitary with no primitive match
        let matrix = gates::rz(0.4) * gates::ry(1.1) * gates::rz(-0.9) * gates::p(0.6);
        let decomposition =
            decompose_single_qubit_matrix(0, &matrix, DECOMPOSITION_TOLERANCE).unwrap();
        assert!(decomposition.len() >= 3);

        let reconstructed = reconstruct_single(&decomposition);
        assert!(
            reconstructed.almost_eq_with_tolerance(&matrix, 1.0e-8),
            "reconstruction diverged"
        );
    }

    #[test]
    fn test_zyz_handles_diagonal_and_antidiagonal() {
        // γ = 0 (diagonal) and γ = π (antidiagonal) exercise the arg fallbacks
        let diagonal = Matrix2x2::new(
            Complex64::from_polar(1.0, 0.3),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, -1.2),
        );
        let decomposition =
            decompose_single_qubit_matrix(0, &diagonal, DECOMPOSITION_TOLERANCE).unwrap();
        assert!(reconstruct_single(&decomposition).almost_eq_with_tolerance(&diagonal, 1.0e-8));

        let antidiagonal = Matrix2x2::new(
            ZERO,
            Complex64::from_polar(1.0, 0.7),
            Complex64::from_polar(1.0, 2.0),
            ZERO,
        );
        let decomposition =
            decompose_single_qubit_matrix(0, &antidiagonal, DECOMPOSITION_TOLERANCE).unwrap();
        assert!(
            reconstruct_single(&decomposition).almost_eq_with_tolerance(&antidiagonal, 1.0e-8)
        );
    }

    #[test]
    fn test_non_unitary_rejected() {
        let shrunk = Matrix2x2::new(c(0.5, 0.0), ZERO, ZERO, c(0.5, 0.0));
        assert!(decompose_single_qubit_matrix(0, &shrunk, DECOMPOSITION_TOLERANCE).is_err());
    }

    #[test]
    fn test_controlled_recognized_maps_to_controlled_primitive() {
        let decomposition =
            decompose_controlled_matrix(0, 1, &gates::H, DECOMPOSITION_TOLERANCE).unwrap();
        assert_eq!(decomposition.len(), 1);
        assert_eq!(decomposition[0].gate, Gate::CH);
        assert_eq!(decomposition[0].control_target(), (0, 1));

        let decomposition =
            decompose_controlled_matrix(0, 1, &gates::rz(0.4), DECOMPOSITION_TOLERANCE).unwrap();
        assert_eq!(decomposition[0].gate, Gate::CRZ);
    }

    #[test]
    fn test_controlled_abc_pattern_shape() {
        let matrix = gates::rz(0.4) * gates::ry(1.1) * gates::rz(-0.9) * gates::p(0.6);
        let decomposition =
            decompose_controlled_matrix(0, 1, &matrix, DECOMPOSITION_TOLERANCE).unwrap();

        let cx_count = decomposition
            .iter()
            .filter(|info| info.gate == Gate::CX)
            .count();
        assert_eq!(cx_count, 2);
    }

    #[test]
    fn test_controlled_abc_is_identity_when_control_unset() {
        // multiplying only the target-side gates must give the identity
        let matrix = gates::rz(1.9) * gates::ry(0.3) * gates::p(-0.8);
        let decomposition =
            decompose_controlled_matrix(0, 1, &matrix, DECOMPOSITION_TOLERANCE).unwrap();

        let mut total = gates::IDENTITY;
        for info in &decomposition {
            if info.gate == Gate::CX || info.arg0 == 0 {
                continue;
            }
            total = info.gate.target_matrix(info.angle).unwrap() * total;
        }
        assert!(total.almost_eq_with_tolerance(&gates::IDENTITY, 1.0e-8));
    }

    #[test]
    fn test_identity_recognized_as_zero_rotation() {
        let identity = Matrix2x2::new(ONE, ZERO, ZERO, ONE);
        let decomposition =
            decompose_single_qubit_matrix(0, &identity, DECOMPOSITION_TOLERANCE).unwrap();
        assert_eq!(decomposition.len(), 1);
        assert!(decomposition[0].angle.abs() < 1.0e-9);
    }
}
