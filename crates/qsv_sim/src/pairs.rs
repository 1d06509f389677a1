//! Amplitude index-pair enumeration.
//!
//! Gate application touches amplitudes in pairs: for a single-qubit gate on
//! qubit `t`, the pairs of indices differing only in bit `t`; for a
//! controlled gate, the pairs where the control bit is one and the target
//! bit takes both values. Separating the index looping from the update code
//! keeps the pair sets testable on their own, and the `set_state` entry
//! point lets each worker thread own a contiguous sub-range of pairs.

use qsv_core::math::{flat_index_to_grid_2d, flat_index_to_grid_3d, pow_2_int};

/// A half-open range of flat pair indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatIndexPair {
    pub i_lower: usize,
    pub i_upper: usize,
}

impl FlatIndexPair {
    pub fn new(i_lower: usize, i_upper: usize) -> Self {
        Self { i_lower, i_upper }
    }

    pub fn len(&self) -> usize {
        self.i_upper - self.i_lower
    }

    pub fn is_empty(&self) -> bool {
        self.i_upper == self.i_lower
    }
}

/// Number of amplitude pairs swept by a single-qubit gate.
pub fn number_of_single_qubit_gate_pairs(n_qubits: usize) -> usize {
    pow_2_int(n_qubits - 1)
}

/// Number of amplitude pairs swept by a double-qubit gate.
pub fn number_of_double_qubit_gate_pairs(n_qubits: usize) -> usize {
    if n_qubits < 2 {
        0
    } else {
        pow_2_int(n_qubits - 2)
    }
}

/// Enumerates the `2^(n-1)` index pairs `(i₀, i₁)` that differ only in bit
/// `target`, with `i₀` holding target bit zero.
///
/// With `L = 2^target` and `U = 2^(n-target-1)`, the pair at flat position
/// `k = b + a·U` is `i₀ = a + 2·b·L`, `i₁ = i₀ + L`.
#[derive(Debug, Clone)]
pub struct SingleQubitGatePairGenerator {
    i0_max: usize,
    i1_max: usize,
    i0: usize,
    i1: usize,
}

impl SingleQubitGatePairGenerator {
    pub fn new(target_index: usize, n_qubits: usize) -> Self {
        debug_assert!(target_index < n_qubits);
        Self {
            i0_max: pow_2_int(target_index),
            i1_max: pow_2_int(n_qubits - target_index - 1),
            i0: 0,
            i1: 0,
        }
    }

    /// Positions the generator at the `i_state`-th pair.
    pub fn set_state(&mut self, i_state: usize) {
        let (i0, i1) = flat_index_to_grid_2d(i_state, self.i1_max);
        self.i0 = i0;
        self.i1 = i1;
    }

    /// Total number of pairs.
    pub fn size(&self) -> usize {
        self.i0_max * self.i1_max
    }

    /// Returns the current pair and advances.
    pub fn next_pair(&mut self) -> (usize, usize) {
        let state0_index = self.i0 + 2 * self.i1 * self.i0_max;
        let state1_index = state0_index + self.i0_max;

        self.i1 += 1;
        if self.i1 == self.i1_max {
            self.i0 += 1;
            self.i1 = 0;
        }

        (state0_index, state1_index)
    }
}

/// Enumerates the `2^(n-2)` index pairs where bit `control` is one and bit
/// `target` takes the values zero and one.
#[derive(Debug, Clone)]
pub struct DoubleQubitGatePairGenerator {
    lower_shift: usize,
    upper_shift: usize,
    control_shift: usize,
    target_shift: usize,
    i0_max: usize,
    i1_max: usize,
    i2_max: usize,
    i0: usize,
    i1: usize,
    i2: usize,
}

impl DoubleQubitGatePairGenerator {
    pub fn new(control_index: usize, target_index: usize, n_qubits: usize) -> Self {
        debug_assert!(control_index < n_qubits);
        debug_assert!(target_index < n_qubits);
        debug_assert!(control_index != target_index);

        let lower_index = control_index.min(target_index);
        let upper_index = control_index.max(target_index);

        Self {
            lower_shift: pow_2_int(lower_index + 1),
            upper_shift: pow_2_int(upper_index + 1),
            control_shift: pow_2_int(control_index),
            target_shift: pow_2_int(target_index),
            i0_max: pow_2_int(lower_index),
            i1_max: pow_2_int(upper_index - lower_index - 1),
            i2_max: pow_2_int(n_qubits - upper_index - 1),
            i0: 0,
            i1: 0,
            i2: 0,
        }
    }

    /// Positions the generator at the `i_state`-th pair.
    pub fn set_state(&mut self, i_state: usize) {
        let (i0, i1, i2) = flat_index_to_grid_3d(i_state, self.i1_max, self.i2_max);
        self.i0 = i0;
        self.i1 = i1;
        self.i2 = i2;
    }

    /// Total number of pairs.
    pub fn size(&self) -> usize {
        self.i0_max * self.i1_max * self.i2_max
    }

    /// Returns the current pair and advances.
    pub fn next_pair(&mut self) -> (usize, usize) {
        let state0_index = self.i0
            + (self.i1 * self.lower_shift)
            + (self.i2 * self.upper_shift)
            + self.control_shift;
        let state1_index = state0_index + self.target_shift;

        self.i2 += 1;
        if self.i2 == self.i2_max {
            self.i1 += 1;
            self.i2 = 0;

            if self.i1 == self.i1_max {
                self.i0 += 1;
                self.i1 = 0;
            }
        }

        (state0_index, state1_index)
    }
}
