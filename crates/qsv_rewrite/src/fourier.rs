//! Quantum Fourier transform circuit helpers.
//!
//! The forward transform applies, for each position `i` in the qubit list,
//! an H gate followed by controlled phases `CP(π/2^d)` from every later
//! qubit at distance `d`, then reverses the qubit order with swaps. The
//! inverse transform is the exact gate-by-gate reversal with negated
//! angles, so forward followed by inverse is the identity.

use std::f64::consts::PI;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::pow_2_int;
use qsv_core::types::Circuit;

use crate::multiplicity::apply_swap;

fn check_qubit_list_(circuit: &Circuit, qubits: &[usize]) -> Result<()> {
    if qubits.is_empty() {
        return Err(QsvError::rewrite(
            "Fourier transform needs at least one qubit",
        ));
    }
    for (position, &qubit) in qubits.iter().enumerate() {
        if qubit >= circuit.n_qubits() {
            return Err(QsvError::InvalidQubitIndex {
                index: qubit,
                n_qubits: circuit.n_qubits(),
            });
        }
        if qubits[..position].contains(&qubit) {
            return Err(QsvError::rewrite(format!(
                "qubit index {qubit} repeated in Fourier transform"
            )));
        }
    }
    Ok(())
}

/// Appends the forward QFT over the listed qubits.
pub fn apply_forward_fourier_transform(circuit: &mut Circuit, qubits: &[usize]) -> Result<()> {
    check_qubit_list_(circuit, qubits)?;

    for i in 0..qubits.len() {
        circuit.add_h_gate(qubits[i])?;
        for k in (i + 1)..qubits.len() {
            let angle = PI / pow_2_int(k - i) as f64;
            circuit.add_cp_gate(qubits[k], qubits[i], angle)?;
        }
    }

    for i in 0..qubits.len() / 2 {
        apply_swap(circuit, qubits[i], qubits[qubits.len() - 1 - i])?;
    }

    Ok(())
}

/// Appends the inverse QFT over the listed qubits.
pub fn apply_inverse_fourier_transform(circuit: &mut Circuit, qubits: &[usize]) -> Result<()> {
    check_qubit_list_(circuit, qubits)?;

    for i in 0..qubits.len() / 2 {
        apply_swap(circuit, qubits[i], qubits[qubits.len() - 1 - i])?;
    }

    for i in (0..qubits.len()).rev() {
        for k in ((i + 1)..qubits.len()).rev() {
            let angle = -PI / pow_2_int(k - i) as f64;
            circuit.add_cp_gate(qubits[k], qubits[i], angle)?;
        }
        circuit.add_h_gate(qubits[i])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::types::Gate;

    #[test]
    fn test_validation() {
        let mut circuit = Circuit::new(2);
        assert!(apply_forward_fourier_transform(&mut circuit, &[]).is_err());
        assert!(apply_forward_fourier_transform(&mut circuit, &[2]).is_err());
        assert!(apply_forward_fourier_transform(&mut circuit, &[0, 0]).is_err());
    }

    #[test]
    fn test_single_qubit_qft_is_hadamard() {
        let mut circuit = Circuit::new(1);
        apply_forward_fourier_transform(&mut circuit, &[0]).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.elements()[0].as_gate().unwrap().gate, Gate::H);
    }

    #[test]
    fn test_two_qubit_qft_gate_sequence() {
        let mut circuit = Circuit::new(2);
        apply_forward_fourier_transform(&mut circuit, &[0, 1]).unwrap();

        let kinds: Vec<_> = circuit
            .elements()
            .iter()
            .map(|element| element.as_gate().unwrap().gate)
            .collect();
        // H, CP, H, then the three-CX swap
        assert_eq!(
            kinds,
            vec![Gate::H, Gate::CP, Gate::H, Gate::CX, Gate::CX, Gate::CX]
        );

        let cp = circuit.elements()[1].as_gate().unwrap();
        assert_eq!(cp.control_target(), (1, 0));
        assert!((cp.angle - PI / 2.0).abs() < 1.0e-12);
    }

    #[test]
    fn test_inverse_mirrors_forward() {
        let mut forward = Circuit::new(3);
        apply_forward_fourier_transform(&mut forward, &[0, 1, 2]).unwrap();

        let mut inverse = Circuit::new(3);
        apply_inverse_fourier_transform(&mut inverse, &[0, 1, 2]).unwrap();

        assert_eq!(forward.len(), inverse.len());

        // angles of the inverse are the negated forward angles, reversed
        let forward_angles: Vec<f64> = forward
            .elements()
            .iter()
            .filter_map(|e| e.as_gate())
            .filter(|info| info.gate == Gate::CP)
            .map(|info| info.angle)
            .collect();
        let mut inverse_angles: Vec<f64> = inverse
            .elements()
            .iter()
            .filter_map(|e| e.as_gate())
            .filter(|info| info.gate == Gate::CP)
            .map(|info| -info.angle)
            .collect();
        inverse_angles.reverse();
        assert_eq!(forward_angles, inverse_angles);
    }
}
