//! Per-gate amplitude update rules.
//!
//! Every transform gate reduces to a 2x2 matrix applied over the pairs of an
//! index-pair generator; the matrix is resolved once per element (reading
//! parameterized angles and the circuit's matrix table at dispatch time) and
//! the sweep applies it pair by pair. The Pauli fast path keeps specialized
//! X/Y/Z updates that skip the general matrix arithmetic.

use num_complex::Complex64;

use qsv_core::error::{QsvError, Result};
use qsv_core::matrix::Matrix2x2;
use qsv_core::types::{Circuit, Gate, GateInfo};

use crate::pairs::{
    DoubleQubitGatePairGenerator, FlatIndexPair, SingleQubitGatePairGenerator,
};

/// Which pair set a resolved gate sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PairKind {
    Single { target: usize },
    Double { control: usize, target: usize },
}

/// A transform gate with its angle and matrix fully resolved.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedGate {
    pub pairs: PairKind,
    pub matrix: Matrix2x2,
}

/// Resolves a transform gate element against its owning circuit.
///
/// Parameterized angles are read from the circuit's parameter table; U/CU
/// matrices are read from its matrix table. Measurement gates have no
/// resolved form and are dispatched separately.
pub(crate) fn resolve_transform_gate(info: &GateInfo, circuit: &Circuit) -> Result<ResolvedGate> {
    debug_assert!(info.gate != Gate::M);

    let angle = match info.parameter {
        Some(id) => circuit.parameters().value_of(id)?,
        None => info.angle,
    };

    let matrix = match info.gate {
        Gate::U | Gate::CU => *circuit.matrix_at(info.matrix_slot).ok_or_else(|| {
            QsvError::simulation(format!(
                "gate references missing matrix slot {}",
                info.matrix_slot
            ))
        })?,
        gate => gate.target_matrix(angle).ok_or_else(|| {
            QsvError::simulation(format!("gate {gate} has no target matrix"))
        })?,
    };

    let pairs = if info.gate.is_double_qubit_transform() {
        let (control, target) = info.control_target();
        PairKind::Double { control, target }
    } else {
        PairKind::Single {
            target: info.target(),
        }
    };

    Ok(ResolvedGate { pairs, matrix })
}

/// Applies a 2x2 matrix to one amplitude pair.
#[inline]
pub(crate) fn apply_matrix_pair(
    amplitudes: &mut [Complex64],
    i0: usize,
    i1: usize,
    matrix: &Matrix2x2,
) {
    let a0 = amplitudes[i0];
    let a1 = amplitudes[i1];
    amplitudes[i0] = matrix.elem00 * a0 + matrix.elem01 * a1;
    amplitudes[i1] = matrix.elem10 * a0 + matrix.elem11 * a1;
}

/// Sweeps a resolved gate over a contiguous range of its pair set.
pub(crate) fn apply_resolved_gate_over_range(
    amplitudes: &mut [Complex64],
    gate: &ResolvedGate,
    n_qubits: usize,
    range: FlatIndexPair,
) {
    match gate.pairs {
        PairKind::Single { target } => {
            let mut generator = SingleQubitGatePairGenerator::new(target, n_qubits);
            generator.set_state(range.i_lower);
            for _ in range.i_lower..range.i_upper {
                let (i0, i1) = generator.next_pair();
                apply_matrix_pair(amplitudes, i0, i1, &gate.matrix);
            }
        }
        PairKind::Double { control, target } => {
            let mut generator = DoubleQubitGatePairGenerator::new(control, target, n_qubits);
            generator.set_state(range.i_lower);
            for _ in range.i_lower..range.i_upper {
                let (i0, i1) = generator.next_pair();
                apply_matrix_pair(amplitudes, i0, i1, &gate.matrix);
            }
        }
    }
}

/// X on one pair: swap the amplitudes.
#[inline]
pub(crate) fn apply_x_pair(amplitudes: &mut [Complex64], i0: usize, i1: usize) {
    amplitudes.swap(i0, i1);
}

/// Y on one pair: `(p, q) ← (-i·q, +i·p)`.
#[inline]
pub(crate) fn apply_y_pair(amplitudes: &mut [Complex64], i0: usize, i1: usize) {
    let a0 = amplitudes[i0];
    let a1 = amplitudes[i1];
    amplitudes[i0] = Complex64::new(a1.im, -a1.re);
    amplitudes[i1] = Complex64::new(-a0.im, a0.re);
}

/// Z on one pair: negate the target-bit-one amplitude.
#[inline]
pub(crate) fn apply_z_single(amplitudes: &mut [Complex64], i1: usize) {
    amplitudes[i1] = -amplitudes[i1];
}
