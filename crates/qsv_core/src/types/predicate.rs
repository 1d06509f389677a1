//! Classical-control predicates over register bits.

use serde::{Deserialize, Serialize};

use crate::error::{QsvError, Result};
use crate::types::register::ClassicalRegister;

/// Whether the predicate asserts the match or its negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicatePolarity {
    /// True when every listed bit equals its expected value.
    If,
    /// True when at least one listed bit differs from its expected value.
    IfNot,
}

/// A predicate over classical register bits that gates a subcircuit.
///
/// Evaluation fails if any referenced bit has not been measured yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlowPredicate {
    bit_indices: Vec<usize>,
    expected: Vec<u8>,
    polarity: PredicatePolarity,
}

impl ControlFlowPredicate {
    /// Creates a predicate over the listed bits.
    ///
    /// The index and expectation lists must be non-empty, of equal length,
    /// and every expected value must be 0 or 1.
    pub fn new(
        bit_indices: Vec<usize>,
        expected: Vec<u8>,
        polarity: PredicatePolarity,
    ) -> Result<Self> {
        if bit_indices.is_empty() || bit_indices.len() != expected.len() {
            return Err(QsvError::SizeMismatch {
                expected: bit_indices.len(),
                found: expected.len(),
            });
        }

        if expected.iter().any(|&value| value > 1) {
            return Err(QsvError::invalid_state(
                "control-flow predicate expectations must be 0 or 1",
            ));
        }

        Ok(Self {
            bit_indices,
            expected,
            polarity,
        })
    }

    /// Predicate on a single bit: true when `register[bit] == expected`.
    pub fn single(bit_index: usize, expected: u8) -> Result<Self> {
        Self::new(vec![bit_index], vec![expected], PredicatePolarity::If)
    }

    /// Negated predicate on a single bit.
    pub fn single_not(bit_index: usize, expected: u8) -> Result<Self> {
        Self::new(vec![bit_index], vec![expected], PredicatePolarity::IfNot)
    }

    pub fn bit_indices(&self) -> &[usize] {
        &self.bit_indices
    }

    pub fn expected(&self) -> &[u8] {
        &self.expected
    }

    pub fn polarity(&self) -> PredicatePolarity {
        self.polarity
    }

    /// The largest referenced bit index.
    pub fn max_bit_index(&self) -> usize {
        *self.bit_indices.iter().max().expect("predicate is non-empty")
    }

    /// Evaluates the predicate against a register.
    ///
    /// Fails with `UnmeasuredBit` if any referenced bit is unmeasured.
    pub fn evaluate(&self, register: &ClassicalRegister) -> Result<bool> {
        let mut all_match = true;
        for (&bit_index, &expected) in self.bit_indices.iter().zip(&self.expected) {
            if !register.is_measured(bit_index) {
                return Err(QsvError::UnmeasuredBit(bit_index));
            }
            if register.get(bit_index)? != expected {
                all_match = false;
            }
        }

        Ok(match self.polarity {
            PredicatePolarity::If => all_match,
            PredicatePolarity::IfNot => !all_match,
        })
    }
}
