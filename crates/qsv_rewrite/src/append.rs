//! Circuit concatenation.
//!
//! Appending rewrites the right-hand circuit's U/CU matrix slots to point
//! into the combined matrix table, and merges the parameter tables by ID
//! (shared IDs take the right-hand value).

use qsv_core::error::{QsvError, Result};
use qsv_core::types::{Circuit, CircuitElement, Gate};

/// Appends the elements of `right` onto `left` in place.
pub fn extend_circuit(left: &mut Circuit, right: &Circuit) -> Result<()> {
    if left.n_qubits() != right.n_qubits() {
        return Err(QsvError::SizeMismatch {
            expected: left.n_qubits(),
            found: right.n_qubits(),
        });
    }
    if left.n_bits() != right.n_bits() {
        return Err(QsvError::SizeMismatch {
            expected: left.n_bits(),
            found: right.n_bits(),
        });
    }

    left.merge_parameters_from(right);

    let slot_offset = left.matrices().len();
    for matrix in right.matrices() {
        left.push_matrix(*matrix);
    }

    for element in right.elements() {
        match element {
            CircuitElement::Gate(info) => {
                let mut shifted = *info;
                if matches!(info.gate, Gate::U | Gate::CU) {
                    shifted.matrix_slot += slot_offset;
                }
                left.add_gate_info(shifted)?;
            }
            CircuitElement::IfStatement(predicate, subcircuit) => {
                left.add_if_statement(predicate.clone(), (**subcircuit).clone())?;
            }
            CircuitElement::IfElseStatement(predicate, if_subcircuit, else_subcircuit) => {
                left.add_if_else_statement(
                    predicate.clone(),
                    (**if_subcircuit).clone(),
                    (**else_subcircuit).clone(),
                )?;
            }
            CircuitElement::Logger(logger) => {
                left.add_circuit_logger(logger.kind);
            }
        }
    }

    Ok(())
}

/// Concatenates two circuits into a new one.
pub fn append_circuits(mut left: Circuit, right: Circuit) -> Result<Circuit> {
    extend_circuit(&mut left, &right)?;
    Ok(left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::matrix::gates;
    use qsv_core::types::{ControlFlowPredicate, Parameterized};

    #[test]
    fn test_size_mismatch_rejected() {
        let mut left = Circuit::new(2);
        assert!(extend_circuit(&mut left, &Circuit::new(3)).is_err());
        assert!(extend_circuit(&mut left, &Circuit::with_bits(2, 1)).is_err());
    }

    #[test]
    fn test_elements_concatenate_in_order() {
        let mut left = Circuit::new(2);
        left.add_h_gate(0).unwrap();

        let mut right = Circuit::new(2);
        right.add_cx_gate(0, 1).unwrap();
        right.add_m_gate(1).unwrap();

        extend_circuit(&mut left, &right).unwrap();

        let kinds: Vec<_> = left
            .elements()
            .iter()
            .filter_map(CircuitElement::as_gate)
            .map(|info| info.gate)
            .collect();
        assert_eq!(kinds, vec![Gate::H, Gate::CX, Gate::M]);
    }

    #[test]
    fn test_matrix_slots_are_rewritten() {
        let mut left = Circuit::new(1);
        left.add_u_gate(gates::X, 0).unwrap();

        let mut right = Circuit::new(1);
        right.add_u_gate(gates::H, 0).unwrap();
        right.add_u_gate(gates::SX, 0).unwrap();

        extend_circuit(&mut left, &right).unwrap();

        assert_eq!(left.matrices().len(), 3);
        let slots: Vec<_> = left
            .elements()
            .iter()
            .filter_map(CircuitElement::as_gate)
            .map(|info| info.matrix_slot)
            .collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert!(left.matrix_at(1).unwrap().almost_eq(&gates::H));
        assert!(left.matrix_at(2).unwrap().almost_eq(&gates::SX));
    }

    #[test]
    fn test_parameters_merge_right_wins() {
        let mut left = Circuit::new(1);
        let left_id = left.add_parameterized_rx_gate(0, 0.25, Parameterized).unwrap();

        let mut right = Circuit::new(1);
        let right_id = right.add_parameterized_rz_gate(0, 0.5, Parameterized).unwrap();

        extend_circuit(&mut left, &right).unwrap();

        assert_eq!(left.parameter_value(left_id).unwrap(), 0.25);
        assert_eq!(left.parameter_value(right_id).unwrap(), 0.5);

        // a shared ID takes the right-hand binding
        let mut shared_left = Circuit::new(1);
        let shared = shared_left
            .add_parameterized_rx_gate(0, 1.0, Parameterized)
            .unwrap();
        let mut shared_right = shared_left.clone();
        shared_right.set_parameter_value(shared, 2.0).unwrap();

        extend_circuit(&mut shared_left, &shared_right).unwrap();
        assert_eq!(shared_left.parameter_value(shared).unwrap(), 2.0);
    }

    #[test]
    fn test_control_flow_elements_carry_over() {
        let mut branch = Circuit::new(2);
        branch.add_x_gate(1).unwrap();

        let mut right = Circuit::new(2);
        right.add_m_gate(0).unwrap();
        right
            .add_if_statement(ControlFlowPredicate::single(0, 1).unwrap(), branch)
            .unwrap();

        let mut left = Circuit::new(2);
        extend_circuit(&mut left, &right).unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.elements()[1].is_control_flow());
    }

    #[test]
    fn test_append_circuits_moves() {
        let mut left = Circuit::new(1);
        left.add_x_gate(0).unwrap();
        let mut right = Circuit::new(1);
        right.add_h_gate(0).unwrap();

        let combined = append_circuits(left, right).unwrap();
        assert_eq!(combined.len(), 2);
    }
}
