//! Classical register holding measured bits.

use serde::{Deserialize, Serialize};

use crate::error::{QsvError, Result};

/// A fixed-size register of classical bits written by measurement gates.
///
/// Each bit starts unmeasured; a measurement writes 0 or 1 into it. Measuring
/// into an already-written bit overwrites the previous value. A register
/// lives for exactly one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    bits: Vec<Option<u8>>,
}

impl ClassicalRegister {
    /// Creates a register of `n_bits` unmeasured bits.
    pub fn new(n_bits: usize) -> Self {
        Self {
            bits: vec![None; n_bits],
        }
    }

    pub fn n_bits(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the bit has been written.
    pub fn is_measured(&self, bit_index: usize) -> bool {
        self.bits
            .get(bit_index)
            .map(Option::is_some)
            .unwrap_or(false)
    }

    /// Reads a measured bit.
    pub fn get(&self, bit_index: usize) -> Result<u8> {
        match self.bits.get(bit_index) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(QsvError::UnmeasuredBit(bit_index)),
            None => Err(QsvError::InvalidBitIndex {
                index: bit_index,
                n_bits: self.bits.len(),
            }),
        }
    }

    /// Writes a measurement outcome, overwriting any previous value.
    pub fn set(&mut self, bit_index: usize, value: u8) -> Result<()> {
        debug_assert!(value <= 1);
        match self.bits.get_mut(bit_index) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(QsvError::InvalidBitIndex {
                index: bit_index,
                n_bits: self.bits.len(),
            }),
        }
    }

    /// Renders measured bits as characters, unmeasured bits as '-'.
    ///
    /// Character `j` holds bit `j` (little-endian by bit index).
    pub fn as_bitstring(&self) -> String {
        self.bits
            .iter()
            .map(|bit| match bit {
                Some(0) => '0',
                Some(_) => '1',
                None => '-',
            })
            .collect()
    }
}
