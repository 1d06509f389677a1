//! N-local ansatz construction.
//!
//! An N-local circuit alternates rotation layers (every block gate applied
//! across the register, angle gates freshly parameterized) with
//! entanglement layers (block gates applied over a pair pattern). The
//! builder returns the circuit together with the parameter IDs in
//! allocation order, ready to be bound by a variational optimizer.

use tracing::debug;

use qsv_core::error::{QsvError, Result};
use qsv_core::types::{Circuit, Gate, ParameterId};

/// The pair pattern of an entanglement layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entanglement {
    /// Adjacent pairs `(i, i+1)`.
    Linear,
    /// All ordered pairs `(i, j)` with `i < j`.
    Full,
}

const INITIAL_ROTATION_ANGLE: f64 = 0.0;

fn verify_block_gates_(blocks: &[Gate]) -> Result<()> {
    for &gate in blocks {
        if matches!(gate, Gate::U | Gate::CU | Gate::M) {
            return Err(QsvError::rewrite(format!(
                "cannot build an n-local circuit with {gate} gates"
            )));
        }
    }
    Ok(())
}

fn entanglement_pairs_(n_qubits: usize, entanglement: Entanglement) -> Vec<(usize, usize)> {
    match entanglement {
        Entanglement::Linear => (0..n_qubits.saturating_sub(1))
            .map(|i| (i, i + 1))
            .collect(),
        Entanglement::Full => {
            let mut pairs = Vec::new();
            for i in 0..n_qubits {
                for j in (i + 1)..n_qubits {
                    pairs.push((i, j));
                }
            }
            pairs
        }
    }
}

fn apply_rotation_layer_(
    circuit: &mut Circuit,
    blocks: &[Gate],
    parameter_ids: &mut Vec<ParameterId>,
) -> Result<()> {
    let n_qubits = circuit.n_qubits();

    for &gate in blocks {
        if gate.is_one_target() {
            for target in 0..n_qubits {
                circuit.add_one_target_gate(gate, target)?;
            }
        } else if gate.is_one_target_one_angle() {
            for target in 0..n_qubits {
                let id = circuit.add_parameterized_one_target_one_angle_gate(
                    gate,
                    target,
                    INITIAL_ROTATION_ANGLE,
                )?;
                parameter_ids.push(id);
            }
        } else if gate.is_one_control_one_target() {
            for i in 0..n_qubits / 2 {
                circuit.add_one_control_one_target_gate(gate, 2 * i, 2 * i + 1)?;
            }
        } else {
            for i in 0..n_qubits / 2 {
                let id = circuit.add_parameterized_one_control_one_target_one_angle_gate(
                    gate,
                    2 * i,
                    2 * i + 1,
                    INITIAL_ROTATION_ANGLE,
                )?;
                parameter_ids.push(id);
            }
        }
    }

    Ok(())
}

fn apply_entanglement_layer_(
    circuit: &mut Circuit,
    blocks: &[Gate],
    pairs: &[(usize, usize)],
    parameter_ids: &mut Vec<ParameterId>,
) -> Result<()> {
    let n_qubits = circuit.n_qubits();

    for &gate in blocks {
        if gate.is_one_target() {
            for target in 0..n_qubits {
                circuit.add_one_target_gate(gate, target)?;
            }
        } else if gate.is_one_target_one_angle() {
            for target in 0..n_qubits {
                let id = circuit.add_parameterized_one_target_one_angle_gate(
                    gate,
                    target,
                    INITIAL_ROTATION_ANGLE,
                )?;
                parameter_ids.push(id);
            }
        } else if gate.is_one_control_one_target() {
            for &(control, target) in pairs {
                circuit.add_one_control_one_target_gate(gate, control, target)?;
            }
        } else {
            for &(control, target) in pairs {
                let id = circuit.add_parameterized_one_control_one_target_one_angle_gate(
                    gate, control, target, INITIAL_ROTATION_ANGLE,
                )?;
                parameter_ids.push(id);
            }
        }
    }

    Ok(())
}

/// Builds an N-local ansatz circuit.
///
/// Each repetition emits one rotation layer followed by one entanglement
/// layer; a final rotation layer closes the circuit unless
/// `skip_last_rotation_layer` is set. Angle gates are freshly
/// parameterized (initial value zero) and their IDs are returned in
/// allocation order.
pub fn n_local(
    n_qubits: usize,
    rotation_blocks: &[Gate],
    entanglement_blocks: &[Gate],
    entanglement: Entanglement,
    n_repetitions: usize,
    skip_last_rotation_layer: bool,
) -> Result<(Circuit, Vec<ParameterId>)> {
    verify_block_gates_(rotation_blocks)?;
    verify_block_gates_(entanglement_blocks)?;

    debug!(
        n_qubits,
        n_repetitions,
        ?entanglement,
        "building n-local ansatz circuit"
    );

    let mut circuit = Circuit::new(n_qubits);
    let mut parameter_ids = Vec::new();
    let pairs = entanglement_pairs_(n_qubits, entanglement);

    for _ in 0..n_repetitions {
        apply_rotation_layer_(&mut circuit, rotation_blocks, &mut parameter_ids)?;
        apply_entanglement_layer_(&mut circuit, entanglement_blocks, &pairs, &mut parameter_ids)?;
    }

    if !skip_last_rotation_layer {
        apply_rotation_layer_(&mut circuit, rotation_blocks, &mut parameter_ids)?;
    }

    Ok((circuit, parameter_ids))
}
