//! Controlled lifts of whole circuits.
//!
//! `make_controlled_circuit` rewrites every gate of a subcircuit into its
//! controlled counterpart on a larger register, so the entire subcircuit
//! executes iff an external control qubit is one. Gates that are already
//! controlled pick up a second control through the multiplicity-controlled
//! synthesis. Measurements and classical control flow cannot be lifted.

use tracing::debug;

use qsv_core::error::{QsvError, Result};
use qsv_core::types::{Circuit, CircuitElement, Gate, GateInfo};

use crate::append::extend_circuit;
use crate::multiplicity::apply_multiplicity_controlled_u_gate;

/// Builds a circuit of `n_new_qubits` executing `subcircuit` conditionally
/// on `control_qubit`, with subcircuit qubit `q` relocated to
/// `mapped_qubits[q]`.
pub fn make_controlled_circuit(
    subcircuit: &Circuit,
    n_new_qubits: usize,
    control_qubit: usize,
    mapped_qubits: &[usize],
) -> Result<Circuit> {
    check_mapping_(subcircuit, n_new_qubits, control_qubit, mapped_qubits)?;

    debug!(
        n_new_qubits,
        control_qubit,
        n_elements = subcircuit.len(),
        "lifting circuit through a control qubit"
    );

    let mut lifted = Circuit::new(n_new_qubits);

    for element in subcircuit.elements() {
        match element {
            CircuitElement::Gate(info) => {
                lift_gate_(&mut lifted, subcircuit, info, control_qubit, mapped_qubits)?;
            }
            CircuitElement::IfStatement(..) | CircuitElement::IfElseStatement(..) => {
                return Err(QsvError::rewrite(
                    "cannot lift a circuit containing classical control flow",
                ));
            }
            CircuitElement::Logger(logger) => {
                lifted.add_circuit_logger(logger.kind);
            }
        }
    }

    Ok(lifted)
}

fn lift_gate_(
    lifted: &mut Circuit,
    subcircuit: &Circuit,
    info: &GateInfo,
    control_qubit: usize,
    mapped_qubits: &[usize],
) -> Result<()> {
    let resolved_angle = match info.parameter {
        Some(id) => subcircuit.parameters().value_of(id)?,
        None => info.angle,
    };

    if info.gate == Gate::M {
        return Err(QsvError::rewrite(
            "cannot lift a circuit containing measurement gates",
        ));
    }

    if info.gate == Gate::U {
        let matrix = *subcircuit
            .matrix_at(info.matrix_slot)
            .expect("U gate references an owned matrix slot");
        return lifted.add_cu_gate(matrix, control_qubit, mapped_qubits[info.target()]);
    }

    if info.gate == Gate::CU {
        let matrix = *subcircuit
            .matrix_at(info.matrix_slot)
            .expect("CU gate references an owned matrix slot");
        let (original_control, original_target) = info.control_target();
        return apply_multiplicity_controlled_u_gate(
            lifted,
            matrix,
            mapped_qubits[original_target],
            &[control_qubit, mapped_qubits[original_control]],
        );
    }

    if info.gate.is_one_target() {
        let controlled = info.gate.controlled().expect("one-target gates lift");
        return lifted.add_one_control_one_target_gate(
            controlled,
            control_qubit,
            mapped_qubits[info.target()],
        );
    }

    if info.gate.is_one_target_one_angle() {
        let controlled = info.gate.controlled().expect("angle gates lift");
        return lifted.add_one_control_one_target_one_angle_gate(
            controlled,
            control_qubit,
            mapped_qubits[info.target()],
            resolved_angle,
        );
    }

    // already-controlled gates pick up a second control
    let matrix = info
        .gate
        .target_matrix(resolved_angle)
        .expect("controlled primitive gates have a target matrix");
    let (original_control, original_target) = info.control_target();
    apply_multiplicity_controlled_u_gate(
        lifted,
        matrix,
        mapped_qubits[original_target],
        &[control_qubit, mapped_qubits[original_control]],
    )
}

fn check_mapping_(
    subcircuit: &Circuit,
    n_new_qubits: usize,
    control_qubit: usize,
    mapped_qubits: &[usize],
) -> Result<()> {
    if mapped_qubits.len() != subcircuit.n_qubits() {
        return Err(QsvError::SizeMismatch {
            expected: subcircuit.n_qubits(),
            found: mapped_qubits.len(),
        });
    }
    if control_qubit >= n_new_qubits {
        return Err(QsvError::InvalidQubitIndex {
            index: control_qubit,
            n_qubits: n_new_qubits,
        });
    }

    for (position, &mapped) in mapped_qubits.iter().enumerate() {
        if mapped >= n_new_qubits {
            return Err(QsvError::InvalidQubitIndex {
                index: mapped,
                n_qubits: n_new_qubits,
            });
        }
        if mapped == control_qubit {
            return Err(QsvError::rewrite(
                "control qubit collides with a mapped subcircuit qubit",
            ));
        }
        if mapped_qubits[..position].contains(&mapped) {
            return Err(QsvError::rewrite(format!(
                "qubit index {mapped} repeated in controlled-circuit mapping"
            )));
        }
    }

    Ok(())
}

/// Binary-controlled circuit from repetition: control `i` gates `2^i`
/// sequential copies of the subcircuit.
///
/// This synthesizes the `U^(2^i)` gadgets of phase estimation when only a
/// single power of the subcircuit is available.
pub fn make_binary_controlled_circuit_naive(
    subcircuit: &Circuit,
    n_new_qubits: usize,
    control_qubits: &[usize],
    mapped_qubits: &[usize],
) -> Result<Circuit> {
    let mut combined = Circuit::new(n_new_qubits);

    for (position, &control) in control_qubits.iter().enumerate() {
        let lifted =
            make_controlled_circuit(subcircuit, n_new_qubits, control, mapped_qubits)?;
        for _ in 0..(1usize << position) {
            extend_circuit(&mut combined, &lifted)?;
        }
    }

    Ok(combined)
}

/// Binary-controlled circuit from caller-supplied binary powers: position
/// `i` uses `subcircuit_powers[i]` (assumed to implement `U^(2^i)`) once.
pub fn make_binary_controlled_circuit_from_binary_powers(
    subcircuit_powers: &[Circuit],
    n_new_qubits: usize,
    control_qubits: &[usize],
    mapped_qubits: &[usize],
) -> Result<Circuit> {
    if subcircuit_powers.len() != control_qubits.len() {
        return Err(QsvError::SizeMismatch {
            expected: control_qubits.len(),
            found: subcircuit_powers.len(),
        });
    }

    let mut combined = Circuit::new(n_new_qubits);

    for (power, &control) in subcircuit_powers.iter().zip(control_qubits) {
        let lifted = make_controlled_circuit(power, n_new_qubits, control, mapped_qubits)?;
        extend_circuit(&mut combined, &lifted)?;
    }

    Ok(combined)
}
