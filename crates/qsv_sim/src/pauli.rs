//! Fast in-place Pauli-string simulation and expectation values.

use num_complex::Complex64;

use qsv_core::error::{QsvError, Result};
use qsv_core::types::{PauliOperator, PauliTerm, SparsePauliString};

use crate::kernel::{apply_x_pair, apply_y_pair, apply_z_single};
use crate::pairs::SingleQubitGatePairGenerator;
use crate::statevector::{inner_product, Statevector};

/// Applies a Pauli string to the state in place.
///
/// Each stored factor sweeps its qubit's pair set with the specialized
/// X/Y/Z update. The string's phase tag is not applied here; it belongs to
/// expectation-value computation, so simulation stays phase-agnostic.
pub fn simulate_pauli(pauli_string: &SparsePauliString, state: &mut Statevector) -> Result<()> {
    if pauli_string.n_qubits() != state.n_qubits() {
        return Err(QsvError::SizeMismatch {
            expected: state.n_qubits(),
            found: pauli_string.n_qubits(),
        });
    }

    let n_qubits = state.n_qubits();
    let amplitudes = state.amplitudes_mut();

    for &(target, term) in pauli_string.terms() {
        let mut generator = SingleQubitGatePairGenerator::new(target, n_qubits);
        let n_pairs = generator.size();

        match term {
            PauliTerm::X => {
                for _ in 0..n_pairs {
                    let (i0, i1) = generator.next_pair();
                    apply_x_pair(amplitudes, i0, i1);
                }
            }
            PauliTerm::Y => {
                for _ in 0..n_pairs {
                    let (i0, i1) = generator.next_pair();
                    apply_y_pair(amplitudes, i0, i1);
                }
            }
            PauliTerm::Z => {
                for _ in 0..n_pairs {
                    let (_, i1) = generator.next_pair();
                    apply_z_single(amplitudes, i1);
                }
            }
            PauliTerm::I => {}
        }
    }

    Ok(())
}

/// The expectation value `phase · ⟨ψ|S|ψ⟩` of one Pauli string.
pub fn expectation_value_string(
    pauli_string: &SparsePauliString,
    state: &Statevector,
) -> Result<Complex64> {
    let mut ket = state.clone();
    simulate_pauli(pauli_string, &mut ket)?;

    let overlap = inner_product(state, &ket)?;
    Ok(pauli_string.phase().to_complex() * overlap)
}

/// The expectation value `Σₖ coeffₖ · phaseₖ · ⟨ψ|Sₖ|ψ⟩` of an operator.
pub fn expectation_value(operator: &PauliOperator, state: &Statevector) -> Result<Complex64> {
    if operator.n_qubits() != state.n_qubits() {
        return Err(QsvError::SizeMismatch {
            expected: state.n_qubits(),
            found: operator.n_qubits(),
        });
    }

    let mut total = Complex64::new(0.0, 0.0);
    for term in operator.terms() {
        total += term.coefficient * expectation_value_string(&term.pauli_string, state)?;
    }

    Ok(total)
}
