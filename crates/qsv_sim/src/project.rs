//! Projection of a statevector onto a measured subspace.

use num_complex::Complex64;

use crate::statevector::Statevector;
use qsv_core::error::{QsvError, Result};
use qsv_core::math::{pow_2_int, PROBABILITY_CUTOFF};

/// Projects the state onto the subspace where each listed qubit equals its
/// expected bit, then renormalizes over the remaining qubits.
///
/// The surviving qubits keep their relative order. Fails if the index and
/// bit lists disagree in length, if any index is out of range or repeated,
/// if any expected bit is not 0/1, or if the surviving norm is below the
/// probability cutoff.
pub fn project_statevector(
    state: &Statevector,
    qubit_indices: &[usize],
    expected_bits: &[u8],
) -> Result<Statevector> {
    if qubit_indices.len() != expected_bits.len() {
        return Err(QsvError::SizeMismatch {
            expected: qubit_indices.len(),
            found: expected_bits.len(),
        });
    }
    if qubit_indices.is_empty() {
        return Err(QsvError::construction(
            "projection needs at least one qubit index",
        ));
    }
    if qubit_indices.len() >= state.n_qubits() {
        return Err(QsvError::construction(
            "projection must leave at least one qubit",
        ));
    }

    for (position, &qubit) in qubit_indices.iter().enumerate() {
        if qubit >= state.n_qubits() {
            return Err(QsvError::InvalidQubitIndex {
                index: qubit,
                n_qubits: state.n_qubits(),
            });
        }
        if qubit_indices[..position].contains(&qubit) {
            return Err(QsvError::construction(format!(
                "qubit index {qubit} repeated in projection"
            )));
        }
    }
    if expected_bits.iter().any(|&bit| bit > 1) {
        return Err(QsvError::invalid_state(
            "projection expectations must be 0 or 1",
        ));
    }

    let n_remaining = state.n_qubits() - qubit_indices.len();
    let remaining_qubits: Vec<usize> = (0..state.n_qubits())
        .filter(|qubit| !qubit_indices.contains(qubit))
        .collect();

    let mut amplitudes = vec![Complex64::new(0.0, 0.0); pow_2_int(n_remaining)];
    for index in 0..state.n_states() {
        let matches = qubit_indices
            .iter()
            .zip(expected_bits)
            .all(|(&qubit, &bit)| ((index >> qubit) & 1) as u8 == bit);
        if !matches {
            continue;
        }

        let mut compact = 0usize;
        for (new_position, &qubit) in remaining_qubits.iter().enumerate() {
            if (index >> qubit) & 1 == 1 {
                compact |= 1 << new_position;
            }
        }
        amplitudes[compact] = state.amplitude(index);
    }

    let norm_squared: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
    if norm_squared < PROBABILITY_CUTOFF {
        return Err(QsvError::Unnormalizable { norm: norm_squared });
    }

    let scale = 1.0 / norm_squared.sqrt();
    for amplitude in &mut amplitudes {
        *amplitude *= scale;
    }

    Statevector::from_amplitudes(amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::math::Endian;
    use qsv_core::matrix::ONE;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_project_product_state() {
        // |10⟩ (qubit 0 set): projecting qubit 0 onto 1 leaves |0⟩
        let state = Statevector::from_bitstring("10", Endian::Little).unwrap();
        let projected = project_statevector(&state, &[0], &[1]).unwrap();

        assert_eq!(projected.n_qubits(), 1);
        assert_eq!(projected.amplitude(0), ONE);
    }

    #[test]
    fn test_project_bell_state() {
        // (|00⟩ + |11⟩)/√2 projected on qubit 0 = 1 leaves |1⟩
        let norm = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let bell = Statevector::from_amplitudes(vec![
            norm,
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            norm,
        ])
        .unwrap();

        let projected = project_statevector(&bell, &[0], &[1]).unwrap();
        assert!((projected.amplitude(1).re - 1.0).abs() < 1.0e-12);
        assert!(projected.amplitude(0).norm() < 1.0e-12);
    }

    #[test]
    fn test_project_renormalizes() {
        // |+⟩|0⟩: projecting qubit 0 onto 0 leaves a normalized |0⟩
        let norm = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let state = Statevector::from_amplitudes(vec![
            norm,
            norm,
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ])
        .unwrap();

        let projected = project_statevector(&state, &[0], &[0]).unwrap();
        assert!(projected.is_normalized());
        assert!((projected.amplitude(0).re - 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn test_project_impossible_outcome_fails() {
        let state = Statevector::new(2);
        match project_statevector(&state, &[0], &[1]) {
            Err(QsvError::Unnormalizable { .. }) => {}
            other => panic!("expected Unnormalizable, got {other:?}"),
        }
    }

    #[test]
    fn test_project_argument_validation() {
        let state = Statevector::new(3);
        assert!(project_statevector(&state, &[0, 1], &[0]).is_err());
        assert!(project_statevector(&state, &[5], &[0]).is_err());
        assert!(project_statevector(&state, &[0], &[2]).is_err());
        assert!(project_statevector(&state, &[0, 0], &[0, 0]).is_err());
        assert!(project_statevector(&state, &[], &[]).is_err());
        assert!(project_statevector(&state, &[0, 1, 2], &[0, 0, 0]).is_err());
    }

    #[test]
    fn test_projection_preserves_remaining_order() {
        // |110⟩ means qubits 0 and 1 set; project qubit 1 away
        let state = Statevector::from_bitstring("110", Endian::Little).unwrap();
        let projected = project_statevector(&state, &[1], &[1]).unwrap();

        // remaining qubits (0, 2) compact to (0, 1); qubit 0 stays set
        assert_eq!(projected.n_qubits(), 2);
        assert_eq!(projected.amplitude(1), ONE);
    }
}
