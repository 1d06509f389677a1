//! Random statevector generation.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::statevector::Statevector;
use qsv_core::math::pow_2_int;

/// Builds the simulator PRNG, seeded for determinism when requested.
pub(crate) fn build_prng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generates a random normalized statevector.
///
/// Magnitudes are drawn uniformly from [1e-3, 1e1] and normalized; phases
/// are uniform on [0, 2π). A seed makes the state reproducible.
pub fn generate_random_state(n_qubits: usize, seed: Option<u64>) -> Statevector {
    assert!(n_qubits >= 1, "a statevector needs at least one qubit");

    let mut prng = build_prng(seed);
    let n_states = pow_2_int(n_qubits);

    let magnitudes: Vec<f64> = (0..n_states)
        .map(|_| prng.gen_range(1.0e-3..1.0e1))
        .collect();

    let sum_of_squares: f64 = magnitudes.iter().map(|m| m * m).sum();
    let norm = 1.0 / sum_of_squares.sqrt();

    let amplitudes: Vec<Complex64> = magnitudes
        .into_iter()
        .map(|magnitude| {
            let angle = prng.gen_range(0.0..std::f64::consts::TAU);
            Complex64::from_polar(norm * magnitude, angle)
        })
        .collect();

    Statevector::from_amplitudes(amplitudes).expect("amplitudes are normalized by construction")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_state_is_normalized() {
        for n_qubits in 1..=5 {
            let state = generate_random_state(n_qubits, None);
            assert_eq!(state.n_states(), pow_2_int(n_qubits));
            assert!(state.is_normalized());
        }
    }

    #[test]
    fn test_seeded_states_are_reproducible() {
        let first = generate_random_state(3, Some(42));
        let second = generate_random_state(3, Some(42));
        assert!(first.almost_eq_with_tolerance(&second, 1.0e-15));

        let different = generate_random_state(3, Some(43));
        assert!(!first.almost_eq(&different));
    }
}
