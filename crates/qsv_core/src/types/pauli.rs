//! Sparse Pauli strings and weighted Pauli operators.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{QsvError, Result};
use crate::math::COMPLEX_ALMOST_EQ_TOLERANCE;

/// A single-qubit Pauli factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliTerm {
    I,
    X,
    Y,
    Z,
}

/// The global phase tag of a Pauli string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauliPhase {
    PlusOne,
    PlusEye,
    MinusOne,
    MinusEye,
}

impl PauliPhase {
    /// The phase as a complex number.
    pub fn to_complex(self) -> Complex64 {
        match self {
            PauliPhase::PlusOne => Complex64::new(1.0, 0.0),
            PauliPhase::PlusEye => Complex64::new(0.0, 1.0),
            PauliPhase::MinusOne => Complex64::new(-1.0, 0.0),
            PauliPhase::MinusEye => Complex64::new(0.0, -1.0),
        }
    }
}

/// A tensor product of Pauli factors, stored sparsely.
///
/// Only non-identity factors need to be stored; qubit indices are unique
/// within a string. The phase tag multiplies the whole string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparsePauliString {
    n_qubits: usize,
    phase: PauliPhase,
    terms: Vec<(usize, PauliTerm)>,
}

impl SparsePauliString {
    /// Creates an identity string over `n_qubits` with phase +1.
    pub fn new(n_qubits: usize) -> Self {
        Self::with_phase(n_qubits, PauliPhase::PlusOne)
    }

    /// Creates an identity string with an explicit phase.
    pub fn with_phase(n_qubits: usize, phase: PauliPhase) -> Self {
        assert!(n_qubits >= 1, "a Pauli string needs at least one qubit");
        Self {
            n_qubits,
            phase,
            terms: Vec::new(),
        }
    }

    /// Builds a string from one factor per qubit, skipping identities.
    pub fn from_dense(paulis: &[PauliTerm], phase: PauliPhase) -> Self {
        assert!(!paulis.is_empty(), "a Pauli string needs at least one qubit");
        let terms = paulis
            .iter()
            .enumerate()
            .filter(|(_, &term)| term != PauliTerm::I)
            .map(|(index, &term)| (index, term))
            .collect();
        Self {
            n_qubits: paulis.len(),
            phase,
            terms,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn phase(&self) -> PauliPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: PauliPhase) {
        self.phase = phase;
    }

    pub fn terms(&self) -> &[(usize, PauliTerm)] {
        &self.terms
    }

    /// Number of stored (non-identity) factors.
    pub fn weight(&self) -> usize {
        self.terms.len()
    }

    /// Adds a factor at a qubit index not already present.
    pub fn add(&mut self, qubit_index: usize, term: PauliTerm) -> Result<()> {
        self.check_qubit_(qubit_index)?;
        if self.contains_index(qubit_index) {
            return Err(QsvError::construction(format!(
                "Pauli term already present at qubit {qubit_index}"
            )));
        }
        self.terms.push((qubit_index, term));
        Ok(())
    }

    /// Sets the factor at a qubit index, replacing any existing one.
    pub fn overwrite(&mut self, qubit_index: usize, term: PauliTerm) -> Result<()> {
        self.check_qubit_(qubit_index)?;
        match self.terms.iter_mut().find(|(index, _)| *index == qubit_index) {
            Some(entry) => entry.1 = term,
            None => self.terms.push((qubit_index, term)),
        }
        Ok(())
    }

    /// Removes the factor at a qubit index, if present.
    pub fn remove(&mut self, qubit_index: usize) {
        self.terms.retain(|(index, _)| *index != qubit_index);
    }

    /// The factor at a qubit index; identity if none is stored.
    pub fn at(&self, qubit_index: usize) -> PauliTerm {
        self.terms
            .iter()
            .find(|(index, _)| *index == qubit_index)
            .map(|(_, term)| *term)
            .unwrap_or(PauliTerm::I)
    }

    pub fn contains_index(&self, qubit_index: usize) -> bool {
        self.terms.iter().any(|(index, _)| *index == qubit_index)
    }

    /// Equality of the factor sets, ignoring the phase tags.
    pub fn equal_up_to_phase(&self, other: &Self) -> bool {
        if self.n_qubits != other.n_qubits || self.terms.len() != other.terms.len() {
            return false;
        }

        let mut left = self.terms.clone();
        let mut right = other.terms.clone();
        left.sort_by_key(|(index, _)| *index);
        right.sort_by_key(|(index, _)| *index);
        left == right
    }

    fn check_qubit_(&self, index: usize) -> Result<()> {
        if index >= self.n_qubits {
            return Err(QsvError::InvalidQubitIndex {
                index,
                n_qubits: self.n_qubits,
            });
        }
        Ok(())
    }
}

impl PartialEq for SparsePauliString {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase && self.equal_up_to_phase(other)
    }
}

/// One weighted term of a Pauli operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPauliString {
    pub coefficient: Complex64,
    pub pauli_string: SparsePauliString,
}

/// A weighted sum of Pauli strings over a common qubit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliOperator {
    n_qubits: usize,
    terms: Vec<WeightedPauliString>,
}

impl PauliOperator {
    /// Creates an empty operator over `n_qubits`.
    pub fn new(n_qubits: usize) -> Self {
        assert!(n_qubits >= 1, "a Pauli operator needs at least one qubit");
        Self {
            n_qubits,
            terms: Vec::new(),
        }
    }

    /// Builds an operator from a non-empty list of weighted strings.
    ///
    /// Every string must agree on the qubit count.
    pub fn from_terms(terms: Vec<WeightedPauliString>) -> Result<Self> {
        let first_n = terms
            .first()
            .map(|term| term.pauli_string.n_qubits())
            .ok_or_else(|| {
                QsvError::construction("a Pauli operator needs at least one term")
            })?;

        for term in &terms {
            if term.pauli_string.n_qubits() != first_n {
                return Err(QsvError::SizeMismatch {
                    expected: first_n,
                    found: term.pauli_string.n_qubits(),
                });
            }
        }

        Ok(Self {
            n_qubits: first_n,
            terms,
        })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn terms(&self) -> &[WeightedPauliString] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Appends a weighted string.
    pub fn add(&mut self, coefficient: Complex64, pauli_string: SparsePauliString) -> Result<()> {
        if pauli_string.n_qubits() != self.n_qubits {
            return Err(QsvError::SizeMismatch {
                expected: self.n_qubits,
                found: pauli_string.n_qubits(),
            });
        }
        self.terms.push(WeightedPauliString {
            coefficient,
            pauli_string,
        });
        Ok(())
    }

    /// Removes the term at `index`.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.terms.len() {
            return Err(QsvError::construction(format!(
                "no Pauli operator term at index {index}"
            )));
        }
        self.terms.remove(index);
        Ok(())
    }

    /// Termwise approximate equality, coefficients within `tolerance`.
    pub fn almost_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.n_qubits == other.n_qubits
            && self.terms.len() == other.terms.len()
            && self.terms.iter().zip(&other.terms).all(|(left, right)| {
                (left.coefficient - right.coefficient).norm() < tolerance
                    && left.pauli_string == right.pauli_string
            })
    }
}

/// Termwise approximate equality at the default tolerance.
pub fn almost_eq_pauli_operators(left: &PauliOperator, right: &PauliOperator) -> bool {
    left.almost_eq(right, COMPLEX_ALMOST_EQ_TOLERANCE)
}
