//! # QSV I/O
//!
//! File format readers and writers for QSV:
//!
//! - **tangelo**: tangelo-exported circuit files (nom-based line parser).
//! - **statevector_file**: the human-readable statevector save/load format.
//! - **numpy**: numpy-style statevector dumps (read-only).
//! - **pauli_file**: Pauli operator files (read-only).

pub mod error;
pub mod numpy;
pub mod pauli_file;
pub mod statevector_file;
pub mod tangelo;

pub use error::{IoError, Result};
pub use numpy::{read_numpy_statevector, read_numpy_statevector_from_path};
pub use pauli_file::{read_pauli_operator, read_pauli_operator_from_path};
pub use statevector_file::{
    load_statevector, load_statevector_from_path, load_statevector_from_str, save_statevector,
    save_statevector_to_path,
};
pub use tangelo::{read_tangelo_circuit, read_tangelo_circuit_from_path};
