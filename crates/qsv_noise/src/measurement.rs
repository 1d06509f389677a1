//! Per-qubit bit-flip noise applied to measurement probabilities.

use serde::{Deserialize, Serialize};

use qsv_core::error::{QsvError, Result};

/// Per-qubit readout bit-flip probabilities.
///
/// A value `ν` at qubit `k` mixes each probability pair `(p₀, p₁)` that
/// differs only on qubit `k` into `((1-ν)p₀ + νp₁, (1-ν)p₁ + νp₀)`. The
/// mixing acts on the probability vector, never on the amplitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementNoise {
    n_qubits: usize,
    probabilities: Vec<f64>,
}

impl MeasurementNoise {
    /// Creates a noise vector with every qubit noiseless.
    pub fn new(n_qubits: usize) -> Self {
        Self {
            n_qubits,
            probabilities: vec![0.0; n_qubits],
        }
    }

    /// Creates a noise vector with the same flip probability on every qubit.
    pub fn uniform(n_qubits: usize, probability: f64) -> Result<Self> {
        let mut noise = Self::new(n_qubits);
        for qubit in 0..n_qubits {
            noise.set(qubit, probability)?;
        }
        Ok(noise)
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Sets the flip probability for one qubit.
    pub fn set(&mut self, qubit_index: usize, probability: f64) -> Result<()> {
        self.check_index_(qubit_index)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(QsvError::invalid_state(format!(
                "bit-flip probability {probability} is outside [0, 1]"
            )));
        }
        self.probabilities[qubit_index] = probability;
        Ok(())
    }

    /// Reads the flip probability for one qubit.
    pub fn get(&self, qubit_index: usize) -> Result<f64> {
        self.check_index_(qubit_index)?;
        Ok(self.probabilities[qubit_index])
    }

    fn check_index_(&self, index: usize) -> Result<()> {
        if index >= self.n_qubits {
            return Err(QsvError::InvalidQubitIndex {
                index,
                n_qubits: self.n_qubits,
            });
        }
        Ok(())
    }
}
