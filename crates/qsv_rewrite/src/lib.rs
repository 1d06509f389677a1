//! # QSV Rewrite
//!
//! Circuit rewriting passes for QSV.
//!
//! ## Modules
//! - **append**: concatenation with matrix-slot and parameter-table merging.
//! - **controlled**: controlled lifts of whole circuits and the
//!   binary-controlled builders used by phase estimation.
//! - **multiplicity**: multi-controlled unitary synthesis (V/V† recursion),
//!   Toffoli, and SWAP lowering.
//! - **decompose**: 2x2 recognition and ZYZ decomposition to primitives.
//! - **transpile**: U/CU elimination over whole circuits.
//! - **fourier**: QFT and inverse-QFT circuit helpers.
//! - **n_local**: parameterized ansatz construction.
//! - **compare**: structural near-equality.

pub mod append;
pub mod compare;
pub mod controlled;
pub mod decompose;
pub mod fourier;
pub mod multiplicity;
pub mod n_local;
pub mod transpile;

pub use append::{append_circuits, extend_circuit};
pub use compare::{almost_eq, almost_eq_with_tolerance};
pub use controlled::{
    make_binary_controlled_circuit_from_binary_powers, make_binary_controlled_circuit_naive,
    make_controlled_circuit,
};
pub use decompose::{
    decompose_controlled_matrix, decompose_single_qubit_matrix, DECOMPOSITION_TOLERANCE,
};
pub use fourier::{apply_forward_fourier_transform, apply_inverse_fourier_transform};
pub use multiplicity::{apply_multiplicity_controlled_u_gate, apply_swap, apply_toffoli_gate};
pub use n_local::{n_local, Entanglement};
pub use transpile::{is_fully_primitive, transpile_to_primitive};
