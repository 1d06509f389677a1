//! Quantum channel surface types.
//!
//! These types describe noise channels as data: Kraus operator sets, mixed
//! unitary ensembles, and Pauli ensembles, each validated at construction.
//! Channel evolution itself (density-matrix simulation) is outside the scope
//! of this crate; the statevector simulator never consumes these types.

use ndarray::Array2;
use num_complex::Complex64;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::COMPLEX_ALMOST_EQ_TOLERANCE;
use qsv_core::matrix::{gates, Matrix2x2};
use qsv_core::types::SparsePauliString;

/// One Kraus operator: a dense complex matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct KrausOperator(pub Array2<Complex64>);

impl KrausOperator {
    /// Wraps a square dense matrix.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(QsvError::SizeMismatch {
                expected: matrix.nrows(),
                found: matrix.ncols(),
            });
        }
        Ok(Self(matrix))
    }

    /// Builds a 2x2 Kraus operator from a gate matrix scaled by `weight`.
    pub fn from_matrix2x2(matrix: &Matrix2x2, weight: f64) -> Self {
        let scale = Complex64::new(weight, 0.0);
        Self(ndarray::array![
            [scale * matrix.elem00, scale * matrix.elem01],
            [scale * matrix.elem10, scale * matrix.elem11],
        ])
    }

    pub fn dim(&self) -> usize {
        self.0.nrows()
    }

    /// The conjugate transpose.
    pub fn adjoint(&self) -> Array2<Complex64> {
        self.0.t().mapv(|value| value.conj())
    }
}

/// A completely positive trace-preserving map given by Kraus operators.
#[derive(Debug, Clone, PartialEq)]
pub struct KrausChannel {
    operators: Vec<KrausOperator>,
}

impl KrausChannel {
    /// Validates the completeness relation `Σ Kᵢ† Kᵢ = I`.
    pub fn new(operators: Vec<KrausOperator>) -> Result<Self> {
        let dim = operators
            .first()
            .map(KrausOperator::dim)
            .ok_or_else(|| QsvError::construction("a Kraus channel needs at least one operator"))?;

        let mut completeness = Array2::<Complex64>::zeros((dim, dim));
        for operator in &operators {
            if operator.dim() != dim {
                return Err(QsvError::SizeMismatch {
                    expected: dim,
                    found: operator.dim(),
                });
            }
            completeness = completeness + operator.adjoint().dot(&operator.0);
        }

        let identity = Array2::<Complex64>::eye(dim);
        let deviation = (&completeness - &identity)
            .iter()
            .map(|value| value.norm())
            .fold(0.0f64, f64::max);

        if deviation > COMPLEX_ALMOST_EQ_TOLERANCE {
            return Err(QsvError::invalid_state(format!(
                "Kraus operators violate completeness by {deviation:.3e}"
            )));
        }

        Ok(Self { operators })
    }

    pub fn operators(&self) -> &[KrausOperator] {
        &self.operators
    }
}

/// A probabilistic mixture of 2x2 unitaries.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedUnitaryChannel {
    ensemble: Vec<(f64, Matrix2x2)>,
}

impl MixedUnitaryChannel {
    /// Validates that probabilities are in [0, 1] and sum to 1.
    pub fn new(ensemble: Vec<(f64, Matrix2x2)>) -> Result<Self> {
        check_probability_ensemble(ensemble.iter().map(|(probability, _)| *probability))?;
        Ok(Self { ensemble })
    }

    pub fn ensemble(&self) -> &[(f64, Matrix2x2)] {
        &self.ensemble
    }
}

/// A probabilistic mixture of Pauli strings.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliChannel {
    ensemble: Vec<(f64, SparsePauliString)>,
}

impl PauliChannel {
    /// Validates probabilities and uniform qubit counts.
    pub fn new(ensemble: Vec<(f64, SparsePauliString)>) -> Result<Self> {
        check_probability_ensemble(ensemble.iter().map(|(probability, _)| *probability))?;

        let n_qubits = ensemble[0].1.n_qubits();
        for (_, string) in &ensemble {
            if string.n_qubits() != n_qubits {
                return Err(QsvError::SizeMismatch {
                    expected: n_qubits,
                    found: string.n_qubits(),
                });
            }
        }

        Ok(Self { ensemble })
    }

    pub fn ensemble(&self) -> &[(f64, SparsePauliString)] {
        &self.ensemble
    }
}

fn check_probability_ensemble(probabilities: impl Iterator<Item = f64>) -> Result<()> {
    let mut total = 0.0;
    let mut count = 0usize;

    for probability in probabilities {
        if !(0.0..=1.0).contains(&probability) {
            return Err(QsvError::invalid_state(format!(
                "ensemble probability {probability} is outside [0, 1]"
            )));
        }
        total += probability;
        count += 1;
    }

    if count == 0 {
        return Err(QsvError::construction("channel ensemble is empty"));
    }
    if (total - 1.0).abs() > COMPLEX_ALMOST_EQ_TOLERANCE {
        return Err(QsvError::invalid_state(format!(
            "ensemble probabilities sum to {total}, expected 1"
        )));
    }

    Ok(())
}

/// The depolarizing channel: I with probability 1-p, X/Y/Z with p/3 each.
pub fn depolarizing(probability: f64) -> Result<MixedUnitaryChannel> {
    let third = probability / 3.0;
    MixedUnitaryChannel::new(vec![
        (1.0 - probability, gates::IDENTITY),
        (third, gates::X),
        (third, gates::Y),
        (third, gates::Z),
    ])
}

/// The bit-flip channel: X with probability p.
pub fn bit_flip(probability: f64) -> Result<MixedUnitaryChannel> {
    MixedUnitaryChannel::new(vec![
        (1.0 - probability, gates::IDENTITY),
        (probability, gates::X),
    ])
}

/// The phase-flip channel: Z with probability p.
pub fn phase_flip(probability: f64) -> Result<MixedUnitaryChannel> {
    MixedUnitaryChannel::new(vec![
        (1.0 - probability, gates::IDENTITY),
        (probability, gates::Z),
    ])
}

/// The amplitude-damping channel with damping rate γ, as a Kraus pair.
pub fn amplitude_damping(gamma: f64) -> Result<KrausChannel> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(QsvError::invalid_state(format!(
            "damping rate {gamma} is outside [0, 1]"
        )));
    }

    let k0 = KrausOperator::new(ndarray::array![
        [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        [Complex64::new(0.0, 0.0), Complex64::new((1.0 - gamma).sqrt(), 0.0)],
    ])?;
    let k1 = KrausOperator::new(ndarray::array![
        [Complex64::new(0.0, 0.0), Complex64::new(gamma.sqrt(), 0.0)],
        [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
    ])?;

    KrausChannel::new(vec![k0, k1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::types::PauliTerm;

    #[test]
    fn test_kraus_completeness_accepted() {
        assert!(amplitude_damping(0.3).is_ok());
        assert!(amplitude_damping(0.0).is_ok());
        assert!(amplitude_damping(1.0).is_ok());
    }

    #[test]
    fn test_kraus_completeness_rejected() {
        // a single damped identity is not trace preserving
        let k = KrausOperator::from_matrix2x2(&gates::IDENTITY, 0.5);
        assert!(KrausChannel::new(vec![k]).is_err());
    }

    #[test]
    fn test_kraus_empty_rejected() {
        assert!(KrausChannel::new(vec![]).is_err());
    }

    #[test]
    fn test_mixed_unitary_probability_validation() {
        assert!(depolarizing(0.1).is_ok());
        assert!(MixedUnitaryChannel::new(vec![(0.6, gates::IDENTITY), (0.6, gates::X)]).is_err());
        assert!(MixedUnitaryChannel::new(vec![(-0.1, gates::IDENTITY), (1.1, gates::X)]).is_err());
    }

    #[test]
    fn test_standard_channels_shape() {
        let channel = bit_flip(0.25).unwrap();
        assert_eq!(channel.ensemble().len(), 2);
        assert!(channel.ensemble()[1].1.almost_eq(&gates::X));

        let channel = phase_flip(0.25).unwrap();
        assert!(channel.ensemble()[1].1.almost_eq(&gates::Z));
    }

    #[test]
    fn test_pauli_channel() {
        let mut x0 = SparsePauliString::new(2);
        x0.add(0, PauliTerm::X).unwrap();
        let identity = SparsePauliString::new(2);

        let channel = PauliChannel::new(vec![(0.9, identity), (0.1, x0)]).unwrap();
        assert_eq!(channel.ensemble().len(), 2);

        let mismatched = SparsePauliString::new(3);
        assert!(PauliChannel::new(vec![(1.0, mismatched)]).is_err());
    }
}
