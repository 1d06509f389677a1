//! Multi-controlled unitary synthesis.
//!
//! The multiplicity-controlled U gadget uses the standard V/V† recursion:
//! with `V·V = U`,
//!
//! ```text
//! mcu(U, t, c0..ck) = cu(V, ck, t)
//!                     mcu(X, ck, c0..ck-1)
//!                     cu(V†, ck, t)
//!                     mcu(X, ck, c0..ck-1)
//!                     mcu(V, t, c0..ck-1)
//! ```
//!
//! The Toffoli gate is the two-control instance with U = X.

use qsv_core::error::{QsvError, Result};
use qsv_core::matrix::{gates, Matrix2x2};
use qsv_core::types::Circuit;

/// Appends gates applying `unitary` on `target` iff every control is one.
///
/// Zero controls append a plain U gate and one control a CU gate; more
/// controls expand through the V/V† recursion above.
pub fn apply_multiplicity_controlled_u_gate(
    circuit: &mut Circuit,
    unitary: Matrix2x2,
    target: usize,
    controls: &[usize],
) -> Result<()> {
    for (position, &control) in controls.iter().enumerate() {
        if control == target {
            return Err(QsvError::rewrite(
                "multiplicity-controlled gate target repeated among controls",
            ));
        }
        if controls[..position].contains(&control) {
            return Err(QsvError::rewrite(format!(
                "control qubit {control} repeated in multiplicity-controlled gate"
            )));
        }
    }

    apply_mcu_(circuit, unitary, target, controls)
}

fn apply_mcu_(
    circuit: &mut Circuit,
    unitary: Matrix2x2,
    target: usize,
    controls: &[usize],
) -> Result<()> {
    match controls {
        [] => circuit.add_u_gate(unitary, target),
        [control] => circuit.add_cu_gate(unitary, *control, target),
        [rest @ .., last] => {
            let root = unitary.sqrt_matrix()?;

            circuit.add_cu_gate(root, *last, target)?;
            apply_mcu_(circuit, gates::X, *last, rest)?;
            circuit.add_cu_gate(root.adjoint(), *last, target)?;
            apply_mcu_(circuit, gates::X, *last, rest)?;
            apply_mcu_(circuit, root, target, rest)
        }
    }
}

/// Appends a Toffoli gate on `(controls.0, controls.1, target)`.
pub fn apply_toffoli_gate(
    circuit: &mut Circuit,
    controls: (usize, usize),
    target: usize,
) -> Result<()> {
    apply_multiplicity_controlled_u_gate(
        circuit,
        gates::X,
        target,
        &[controls.0, controls.1],
    )
}

/// Appends a SWAP of two qubits as the standard three-CX pattern.
pub fn apply_swap(circuit: &mut Circuit, qubit0: usize, qubit1: usize) -> Result<()> {
    circuit.add_cx_gate(qubit0, qubit1)?;
    circuit.add_cx_gate(qubit1, qubit0)?;
    circuit.add_cx_gate(qubit0, qubit1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_controls_is_plain_u() {
        let mut circuit = Circuit::new(1);
        apply_multiplicity_controlled_u_gate(&mut circuit, gates::H, 0, &[]).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(
            circuit.elements()[0].as_gate().unwrap().gate,
            qsv_core::types::Gate::U
        );
    }

    #[test]
    fn test_one_control_is_cu() {
        let mut circuit = Circuit::new(2);
        apply_multiplicity_controlled_u_gate(&mut circuit, gates::H, 1, &[0]).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(
            circuit.elements()[0].as_gate().unwrap().gate,
            qsv_core::types::Gate::CU
        );
    }

    #[test]
    fn test_two_controls_expand_to_five_gates() {
        let mut circuit = Circuit::new(3);
        apply_toffoli_gate(&mut circuit, (0, 1), 2).unwrap();
        assert_eq!(circuit.len(), 5);
    }

    #[test]
    fn test_invalid_operands_rejected() {
        let mut circuit = Circuit::new(3);
        assert!(
            apply_multiplicity_controlled_u_gate(&mut circuit, gates::X, 1, &[1, 2]).is_err()
        );
        assert!(
            apply_multiplicity_controlled_u_gate(&mut circuit, gates::X, 0, &[2, 2]).is_err()
        );
    }

    #[test]
    fn test_swap_is_three_cx() {
        let mut circuit = Circuit::new(2);
        apply_swap(&mut circuit, 0, 1).unwrap();
        assert_eq!(circuit.len(), 3);
    }
}
