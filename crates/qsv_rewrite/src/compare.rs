//! Structural circuit comparison.

use qsv_core::math::{COMPLEX_ALMOST_EQ_TOLERANCE, GATE_ANGLE_TOLERANCE};
use qsv_core::types::{Circuit, CircuitElement, Gate};

/// Structural near-equality of two circuits at the default tolerances.
///
/// Logger elements are filtered out before pairing; gates compare by kind,
/// operand indices, and angle within tolerance; U/CU gates additionally
/// compare their referenced matrices entrywise; control-flow elements
/// require matching predicates and recursively equal subcircuits.
pub fn almost_eq(left: &Circuit, right: &Circuit) -> bool {
    almost_eq_with_tolerance(left, right, GATE_ANGLE_TOLERANCE)
}

/// Structural near-equality with an explicit angle/matrix tolerance.
pub fn almost_eq_with_tolerance(left: &Circuit, right: &Circuit, tolerance: f64) -> bool {
    if left.n_qubits() != right.n_qubits() || left.n_bits() != right.n_bits() {
        return false;
    }

    let left_elements: Vec<&CircuitElement> = left
        .elements()
        .iter()
        .filter(|element| !element.is_logger())
        .collect();
    let right_elements: Vec<&CircuitElement> = right
        .elements()
        .iter()
        .filter(|element| !element.is_logger())
        .collect();

    if left_elements.len() != right_elements.len() {
        return false;
    }

    left_elements
        .iter()
        .zip(&right_elements)
        .all(|(left_element, right_element)| {
            elements_almost_eq_(left, right, left_element, right_element, tolerance)
        })
}

fn elements_almost_eq_(
    left_circuit: &Circuit,
    right_circuit: &Circuit,
    left: &CircuitElement,
    right: &CircuitElement,
    tolerance: f64,
) -> bool {
    match (left, right) {
        (CircuitElement::Gate(left_info), CircuitElement::Gate(right_info)) => {
            // parameterized angles compare by their currently bound value
            let mut left_info = *left_info;
            if let Some(id) = left_info.parameter {
                if let Ok(value) = left_circuit.parameters().value_of(id) {
                    left_info.angle = value;
                }
            }
            let mut right_info = *right_info;
            if let Some(id) = right_info.parameter {
                if let Ok(value) = right_circuit.parameters().value_of(id) {
                    right_info.angle = value;
                }
            }

            if !left_info.almost_eq_with_tolerance(&right_info, tolerance) {
                return false;
            }
            if matches!(left_info.gate, Gate::U | Gate::CU) {
                let left_matrix = left_circuit
                    .matrix_at(left_info.matrix_slot)
                    .expect("gate references an owned matrix slot");
                let right_matrix = right_circuit
                    .matrix_at(right_info.matrix_slot)
                    .expect("gate references an owned matrix slot");
                return left_matrix
                    .almost_eq_with_tolerance(right_matrix, COMPLEX_ALMOST_EQ_TOLERANCE);
            }
            true
        }
        (
            CircuitElement::IfStatement(left_predicate, left_sub),
            CircuitElement::IfStatement(right_predicate, right_sub),
        ) => {
            left_predicate == right_predicate
                && almost_eq_with_tolerance(left_sub, right_sub, tolerance)
        }
        (
            CircuitElement::IfElseStatement(left_predicate, left_if, left_else),
            CircuitElement::IfElseStatement(right_predicate, right_if, right_else),
        ) => {
            left_predicate == right_predicate
                && almost_eq_with_tolerance(left_if, right_if, tolerance)
                && almost_eq_with_tolerance(left_else, right_else, tolerance)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::matrix::gates;
    use qsv_core::types::{ControlFlowPredicate, LoggerKind, Parameterized};

    #[test]
    fn test_identical_circuits_are_equal() {
        let mut left = Circuit::new(2);
        left.add_h_gate(0).unwrap();
        left.add_cx_gate(0, 1).unwrap();

        let right = left.clone();
        assert!(almost_eq(&left, &right));
    }

    #[test]
    fn test_size_mismatch_breaks_equality() {
        assert!(!almost_eq(&Circuit::new(2), &Circuit::new(3)));
        assert!(!almost_eq(&Circuit::new(2), &Circuit::with_bits(2, 1)));
    }

    #[test]
    fn test_loggers_do_not_affect_equality() {
        let mut left = Circuit::new(1);
        left.add_circuit_logger(LoggerKind::Statevector);
        left.add_x_gate(0).unwrap();

        let mut right = Circuit::new(1);
        right.add_x_gate(0).unwrap();
        right.add_circuit_logger(LoggerKind::Probabilities);

        assert!(almost_eq(&left, &right));
    }

    #[test]
    fn test_angle_within_tolerance() {
        let mut left = Circuit::new(1);
        left.add_rx_gate(0, 1.0).unwrap();

        let mut close = Circuit::new(1);
        close.add_rx_gate(0, 1.0 + 1.0e-8).unwrap();
        assert!(almost_eq(&left, &close));

        let mut far = Circuit::new(1);
        far.add_rx_gate(0, 1.01).unwrap();
        assert!(!almost_eq(&left, &far));
    }

    #[test]
    fn test_u_gates_compare_matrices() {
        let mut left = Circuit::new(1);
        left.add_u_gate(gates::SX, 0).unwrap();

        let mut same = Circuit::new(1);
        same.add_u_gate(gates::SX, 0).unwrap();
        assert!(almost_eq(&left, &same));

        let mut different = Circuit::new(1);
        different.add_u_gate(gates::H, 0).unwrap();
        assert!(!almost_eq(&left, &different));
    }

    #[test]
    fn test_matrix_slots_may_differ() {
        // the same U gate stored at different slot positions still compares equal
        let mut left = Circuit::new(1);
        left.add_u_gate(gates::H, 0).unwrap();
        left.add_u_gate(gates::SX, 0).unwrap();

        let mut right = Circuit::new(1);
        right.add_u_gate(gates::H, 0).unwrap();
        let mut tail = Circuit::new(1);
        tail.add_u_gate(gates::SX, 0).unwrap();
        crate::append::extend_circuit(&mut right, &tail).unwrap();

        assert!(almost_eq(&left, &right));
    }

    #[test]
    fn test_parameterization_does_not_affect_equality() {
        let mut bound = Circuit::new(1);
        bound.add_rx_gate(0, 0.5).unwrap();

        let mut parameterized = Circuit::new(1);
        parameterized
            .add_parameterized_rx_gate(0, 0.5, Parameterized)
            .unwrap();

        assert!(almost_eq(&bound, &parameterized));
    }

    #[test]
    fn test_control_flow_comparison() {
        let make = |flip: bool| {
            let mut branch = Circuit::new(2);
            if flip {
                branch.add_x_gate(1).unwrap();
            } else {
                branch.add_y_gate(1).unwrap();
            }

            let mut circuit = Circuit::new(2);
            circuit.add_m_gate(0).unwrap();
            circuit
                .add_if_statement(ControlFlowPredicate::single(0, 1).unwrap(), branch)
                .unwrap();
            circuit
        };

        assert!(almost_eq(&make(true), &make(true)));
        assert!(!almost_eq(&make(true), &make(false)));
    }

    #[test]
    fn test_gate_vs_control_flow_mismatch() {
        let mut gate_circuit = Circuit::new(1);
        gate_circuit.add_x_gate(0).unwrap();

        let mut flow_circuit = Circuit::new(1);
        flow_circuit.add_m_gate(0).unwrap();
        flow_circuit
            .add_if_statement(
                ControlFlowPredicate::single(0, 1).unwrap(),
                Circuit::new(1),
            )
            .unwrap();

        assert!(!almost_eq(&gate_circuit, &flow_circuit));
    }
}
