//! Configuration management for QSV.

use serde::{Deserialize, Serialize};

use crate::math::Endian;

/// Global configuration for the QSV toolkit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QsvConfig {
    /// Simulator configuration
    pub simulator: SimulatorSection,
    /// File I/O configuration
    pub io: IoSection,
}

/// Configuration for the statevector simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSection {
    /// Number of measurement shots when sampling counts
    pub default_shots: usize,
    /// Worker threads for the multithreaded simulator
    pub n_threads: usize,
    /// Refuse to allocate statevectors beyond this many qubits
    pub max_qubits: usize,
}

/// Configuration for statevector file I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoSection {
    /// Endianness used when saving statevectors
    pub statevector_endian: Endian,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            default_shots: 1024,
            n_threads: 1,
            max_qubits: 28,
        }
    }
}

impl Default for IoSection {
    fn default() -> Self {
        Self {
            statevector_endian: Endian::Little,
        }
    }
}

impl QsvConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes configuration to a JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
