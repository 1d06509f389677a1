//! # QSV Noise
//!
//! Measurement noise and quantum channel surface types for QSV.
//!
//! ## Modules
//! - **MeasurementNoise**: per-qubit readout bit-flip probabilities consumed
//!   by the probability calculations in `qsv_sim`.
//! - **channels**: Kraus, mixed-unitary, and Pauli channel descriptions with
//!   construction-time validation.

pub mod channels;
pub mod measurement;

pub use channels::{
    amplitude_damping, bit_flip, depolarizing, phase_flip, KrausChannel, KrausOperator,
    MixedUnitaryChannel, PauliChannel,
};
pub use measurement::MeasurementNoise;
