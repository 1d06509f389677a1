//! The statevector value type.
//!
//! A statevector holds `2^n` complex amplitudes indexed little-endian by
//! qubit: bit `k` of a state index corresponds to qubit `k`. Construction
//! validates normalization to within `NORMALIZATION_TOLERANCE`.

use num_complex::Complex64;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::{
    bitstring_to_state_index, endian_flip, is_power_of_2, log_2_int, pow_2_int, Endian,
    COMPLEX_ALMOST_EQ_TOLERANCE, NORMALIZATION_TOLERANCE,
};
use qsv_core::matrix::{ONE, ZERO};

/// A normalized amplitude vector over the computational basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    n_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Creates the all-zeros state |0...0⟩.
    pub fn new(n_qubits: usize) -> Self {
        assert!(n_qubits >= 1, "a statevector needs at least one qubit");
        let mut amplitudes = vec![ZERO; pow_2_int(n_qubits)];
        amplitudes[0] = ONE;
        Self {
            n_qubits,
            amplitudes,
        }
    }

    /// Creates a computational basis state from a bitstring.
    ///
    /// With `Endian::Little`, character `j` of the string is qubit `j`.
    pub fn from_bitstring(bitstring: &str, endian: Endian) -> Result<Self> {
        if bitstring.is_empty() {
            return Err(QsvError::invalid_state("bitstring must be non-empty"));
        }
        let index = bitstring_to_state_index(bitstring, endian).ok_or_else(|| {
            QsvError::invalid_state(format!("invalid bitstring '{bitstring}'"))
        })?;

        let n_qubits = bitstring.len();
        let mut amplitudes = vec![ZERO; pow_2_int(n_qubits)];
        amplitudes[index] = ONE;
        Ok(Self {
            n_qubits,
            amplitudes,
        })
    }

    /// Wraps an amplitude vector, validating its length and normalization.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        if !is_power_of_2(amplitudes.len()) || amplitudes.len() < 2 {
            return Err(QsvError::invalid_state(format!(
                "amplitude vector length {} is not a power of two",
                amplitudes.len()
            )));
        }

        let norm_squared: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
        if (norm_squared - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(QsvError::Unnormalizable { norm: norm_squared });
        }

        Ok(Self {
            n_qubits: log_2_int(amplitudes.len()),
            amplitudes,
        })
    }

    /// Wraps an amplitude vector given in the specified endianness.
    pub fn from_amplitudes_with_endian(
        amplitudes: Vec<Complex64>,
        endian: Endian,
    ) -> Result<Self> {
        let state = Self::from_amplitudes(amplitudes)?;
        Ok(match endian {
            Endian::Little => state,
            Endian::Big => {
                let n = state.n_qubits;
                let mut flipped = vec![ZERO; state.amplitudes.len()];
                for (index, amplitude) in state.amplitudes.into_iter().enumerate() {
                    flipped[endian_flip(index, n)] = amplitude;
                }
                Self {
                    n_qubits: n,
                    amplitudes: flipped,
                }
            }
        })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn n_states(&self) -> usize {
        self.amplitudes.len()
    }

    /// The amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// The total squared norm `Σ|aᵢ|²`.
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Whether the squared norm is within tolerance of one.
    pub fn is_normalized(&self) -> bool {
        (self.norm_squared() - 1.0).abs() < NORMALIZATION_TOLERANCE
    }

    /// Entrywise approximate equality at the default tolerance.
    pub fn almost_eq(&self, other: &Self) -> bool {
        self.almost_eq_with_tolerance(other, COMPLEX_ALMOST_EQ_TOLERANCE)
    }

    /// Entrywise approximate equality within `tolerance`.
    pub fn almost_eq_with_tolerance(&self, other: &Self, tolerance: f64) -> bool {
        self.n_qubits == other.n_qubits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(left, right)| (left - right).norm() < tolerance)
    }
}

impl std::ops::Index<usize> for Statevector {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Complex64 {
        &self.amplitudes[index]
    }
}

/// The inner product `⟨left|right⟩ = Σ conj(leftᵢ)·rightᵢ`.
pub fn inner_product(left: &Statevector, right: &Statevector) -> Result<Complex64> {
    if left.n_qubits() != right.n_qubits() {
        return Err(QsvError::SizeMismatch {
            expected: left.n_qubits(),
            found: right.n_qubits(),
        });
    }

    Ok(left
        .amplitudes()
        .iter()
        .zip(right.amplitudes())
        .map(|(a, b)| a.conj() * b)
        .sum())
}

/// The tensor product, with `left` occupying the lower qubit indices.
pub fn tensor_product(left: &Statevector, right: &Statevector) -> Statevector {
    let n_left = left.n_qubits();
    let n_qubits = n_left + right.n_qubits();
    let mut amplitudes = vec![ZERO; pow_2_int(n_qubits)];

    for (i_right, amp_right) in right.amplitudes().iter().enumerate() {
        for (i_left, amp_left) in left.amplitudes().iter().enumerate() {
            amplitudes[i_left + (i_right << n_left)] = amp_left * amp_right;
        }
    }

    Statevector {
        n_qubits,
        amplitudes,
    }
}
