//! Error types for QSV.

use thiserror::Error;

/// Unified error type for QSV operations.
#[derive(Error, Debug)]
pub enum QsvError {
    // ============ Construction Errors ============
    /// Qubit operand out of range
    #[error("Invalid qubit index {index}, circuit has {n_qubits} qubits")]
    InvalidQubitIndex { index: usize, n_qubits: usize },

    /// Classical bit operand out of range
    #[error("Invalid bit index {index}, circuit has {n_bits} classical bits")]
    InvalidBitIndex { index: usize, n_bits: usize },

    /// Mismatched circuit or state sizes
    #[error("Size mismatch: expected {expected}, got {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// Parameter ID not present in the circuit's parameter table
    #[error("Unknown parameter ID {0}")]
    UnknownParameterId(String),

    /// Invalid combination of gate operands
    #[error("Circuit construction error: {0}")]
    Construction(String),

    // ============ Simulation Errors ============
    /// Control-flow predicate referenced an unmeasured classical bit
    #[error("Classical bit {0} has not been measured")]
    UnmeasuredBit(usize),

    /// Selected measurement outcome has vanishing probability
    #[error("Measurement outcome probability {probability:.3e} is below the degeneracy cutoff")]
    DegenerateMeasurement { probability: f64 },

    /// Generic simulation failure
    #[error("Simulation error: {0}")]
    Simulation(String),

    // ============ State Errors ============
    /// Amplitude vector cannot be normalized
    #[error("State cannot be normalized: squared norm is {norm:.3e}")]
    Unnormalizable { norm: f64 },

    /// Invalid quantum state
    #[error("Invalid quantum state: {0}")]
    InvalidState(String),

    // ============ Rewrite Errors ============
    /// Circuit rewrite rejected an element
    #[error("Rewrite error: {0}")]
    Rewrite(String),

    /// Matrix square root or gate decomposition failed to converge
    #[error("Numerical decomposition failure: {0}")]
    DecompositionFailure(String),

    // ============ I/O Errors ============
    /// Malformed input file
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for QSV operations.
pub type Result<T> = std::result::Result<T, QsvError>;

impl QsvError {
    /// Creates a simulation error with the given message.
    pub fn simulation(msg: impl Into<String>) -> Self {
        Self::Simulation(msg.into())
    }

    /// Creates a rewrite error with the given message.
    pub fn rewrite(msg: impl Into<String>) -> Self {
        Self::Rewrite(msg.into())
    }

    /// Creates a construction error with the given message.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a decomposition failure with the given message.
    pub fn decomposition(msg: impl Into<String>) -> Self {
        Self::DecompositionFailure(msg.into())
    }

    /// Creates an invalid-state error with the given message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}
