//! Transpilation of U/CU gates into primitive gates.

use tracing::debug;

use qsv_core::error::Result;
use qsv_core::types::{Circuit, CircuitElement, Gate};

use crate::decompose::{decompose_controlled_matrix, decompose_single_qubit_matrix};

/// Rewrites every U/CU element into primitive gates.
///
/// Primitive and measurement elements pass through unchanged, logger
/// elements are propagated verbatim, and classical-control subcircuits are
/// transpiled recursively. The result contains no U or CU elements.
pub fn transpile_to_primitive(circuit: &Circuit, tolerance: f64) -> Result<Circuit> {
    debug!(
        n_elements = circuit.len(),
        n_matrices = circuit.matrices().len(),
        "transpiling circuit to primitive gates"
    );

    let mut transpiled = Circuit::with_bits(circuit.n_qubits(), circuit.n_bits());
    transpiled.merge_parameters_from(circuit);

    for element in circuit.elements() {
        match element {
            CircuitElement::Gate(info) if info.gate == Gate::U => {
                let matrix = circuit
                    .matrix_at(info.matrix_slot)
                    .expect("U gate references an owned matrix slot");
                for gate in decompose_single_qubit_matrix(info.target(), matrix, tolerance)? {
                    transpiled.add_gate_info(gate)?;
                }
            }
            CircuitElement::Gate(info) if info.gate == Gate::CU => {
                let matrix = circuit
                    .matrix_at(info.matrix_slot)
                    .expect("CU gate references an owned matrix slot");
                let (control, target) = info.control_target();
                for gate in decompose_controlled_matrix(control, target, matrix, tolerance)? {
                    transpiled.add_gate_info(gate)?;
                }
            }
            CircuitElement::Gate(info) => {
                transpiled.add_gate_info(*info)?;
            }
            CircuitElement::IfStatement(predicate, subcircuit) => {
                transpiled.add_if_statement(
                    predicate.clone(),
                    transpile_to_primitive(subcircuit, tolerance)?,
                )?;
            }
            CircuitElement::IfElseStatement(predicate, if_subcircuit, else_subcircuit) => {
                transpiled.add_if_else_statement(
                    predicate.clone(),
                    transpile_to_primitive(if_subcircuit, tolerance)?,
                    transpile_to_primitive(else_subcircuit, tolerance)?,
                )?;
            }
            CircuitElement::Logger(logger) => {
                transpiled.add_circuit_logger(logger.kind);
            }
        }
    }

    Ok(transpiled)
}

/// True if the circuit (recursively) contains no U or CU elements.
pub fn is_fully_primitive(circuit: &Circuit) -> bool {
    circuit.elements().iter().all(|element| match element {
        CircuitElement::Gate(info) => !matches!(info.gate, Gate::U | Gate::CU),
        CircuitElement::IfStatement(_, subcircuit) => is_fully_primitive(subcircuit),
        CircuitElement::IfElseStatement(_, if_subcircuit, else_subcircuit) => {
            is_fully_primitive(if_subcircuit) && is_fully_primitive(else_subcircuit)
        }
        CircuitElement::Logger(_) => true,
    })
}
