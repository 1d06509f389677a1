//! Probability vectors, shot sampling, and count tallies.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::{state_index_to_bitstring, Endian};
use qsv_core::types::{Circuit, ClassicalRegister};
use qsv_noise::MeasurementNoise;

use crate::pairs::SingleQubitGatePairGenerator;
use crate::random::build_prng;
use crate::simulator::StatevectorSimulator;
use crate::statevector::Statevector;

/// Fraction of the cumulative total excluded from the sampler's upper end.
///
/// Sampling exactly at the top of the cumulative distribution would select a
/// state index one past the end of the array; shaving a sliver off the upper
/// endpoint keeps every draw in range.
pub const CUMULATIVE_END_OFFSET_FRACTION: f64 = 1.0e-4;

/// The probability vector `|aᵢ|²`, with optional readout bit-flip noise.
///
/// Noise mixes each qubit's probability pairs; it never touches amplitudes.
pub fn calculate_probabilities(
    state: &Statevector,
    noise: Option<&MeasurementNoise>,
) -> Result<Vec<f64>> {
    let mut probabilities: Vec<f64> = state
        .amplitudes()
        .iter()
        .map(|amplitude| amplitude.norm_sqr())
        .collect();

    if let Some(noise) = noise {
        if noise.n_qubits() != state.n_qubits() {
            return Err(QsvError::SizeMismatch {
                expected: state.n_qubits(),
                found: noise.n_qubits(),
            });
        }

        for qubit in 0..state.n_qubits() {
            let flip = noise.get(qubit)?;
            if flip == 0.0 {
                continue;
            }
            apply_bit_flip_noise_(flip, qubit, state.n_qubits(), &mut probabilities);
        }
    }

    Ok(probabilities)
}

fn apply_bit_flip_noise_(
    noise: f64,
    qubit: usize,
    n_qubits: usize,
    probabilities: &mut [f64],
) {
    let mut generator = SingleQubitGatePairGenerator::new(qubit, n_qubits);
    for _ in 0..generator.size() {
        let (i0, i1) = generator.next_pair();
        let p0 = probabilities[i0];
        let p1 = probabilities[i1];
        probabilities[i0] = (1.0 - noise) * p0 + noise * p1;
        probabilities[i1] = (1.0 - noise) * p1 + noise * p0;
    }
}

/// Samples state indices from a probability vector.
///
/// The cumulative distribution is computed once; each draw is a uniform
/// value in `[0, total - ε)` resolved by a lower-bound lookup.
pub struct ProbabilitySampler {
    cumulative: Vec<f64>,
    upper: f64,
    rng: StdRng,
}

impl ProbabilitySampler {
    /// Builds a sampler over a non-empty probability vector.
    pub fn new(probabilities: &[f64], seed: Option<u64>) -> Result<Self> {
        if probabilities.is_empty() {
            return Err(QsvError::construction(
                "cannot sample from an empty probability vector",
            ));
        }

        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut running = 0.0f64;
        for &probability in probabilities {
            running += probability;
            cumulative.push(running);
        }

        let total = running;
        Ok(Self {
            cumulative,
            upper: total * (1.0 - CUMULATIVE_END_OFFSET_FRACTION),
            rng: build_prng(seed),
        })
    }

    /// Draws one state index.
    pub fn sample(&mut self) -> usize {
        let draw = self.rng.gen_range(0.0..self.upper);
        self.cumulative.partition_point(|&threshold| threshold <= draw)
    }
}

/// Draws `n_shots` i.i.d. state indices from a probability vector.
pub fn perform_measurements_as_memory(
    probabilities: &[f64],
    n_shots: usize,
    seed: Option<u64>,
) -> Result<Vec<usize>> {
    let mut sampler = ProbabilitySampler::new(probabilities, seed)?;
    Ok((0..n_shots).map(|_| sampler.sample()).collect())
}

/// Draws `n_shots` state indices from a statevector's distribution.
pub fn perform_measurements_as_memory_from_state(
    state: &Statevector,
    n_shots: usize,
    noise: Option<&MeasurementNoise>,
    seed: Option<u64>,
) -> Result<Vec<usize>> {
    let probabilities = calculate_probabilities(state, noise)?;
    perform_measurements_as_memory(&probabilities, n_shots, seed)
}

/// Tallies sampled state indices.
pub fn memory_to_counts(measurements: &[usize]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for &index in measurements {
        *counts.entry(index).or_insert(0) += 1;
    }
    counts
}

/// Tallies sampled state indices as fractions of the shot count.
pub fn memory_to_fractions(measurements: &[usize]) -> BTreeMap<usize, f64> {
    let n_shots = measurements.len() as f64;
    memory_to_counts(measurements)
        .into_iter()
        .map(|(index, count)| (index, count as f64 / n_shots))
        .collect()
}

/// Samples counts keyed by little-endian bitstring.
pub fn perform_measurements_as_counts(
    state: &Statevector,
    n_shots: usize,
    noise: Option<&MeasurementNoise>,
    seed: Option<u64>,
) -> Result<BTreeMap<String, usize>> {
    perform_measurements_as_counts_marginal(state, n_shots, &[], noise, seed)
}

/// Samples counts with the listed qubits marginalized away.
///
/// Marginalized positions are rendered as the sentinel character 'x', so
/// shots differing only on those qubits tally into the same key.
pub fn perform_measurements_as_counts_marginal(
    state: &Statevector,
    n_shots: usize,
    marginal_qubits: &[usize],
    noise: Option<&MeasurementNoise>,
    seed: Option<u64>,
) -> Result<BTreeMap<String, usize>> {
    let probabilities = calculate_probabilities(state, noise)?;
    perform_measurements_as_counts_marginal_raw(
        &probabilities,
        state.n_qubits(),
        n_shots,
        marginal_qubits,
        seed,
    )
}

/// Samples marginal counts directly from a probability vector.
pub fn perform_measurements_as_counts_marginal_raw(
    probabilities: &[f64],
    n_qubits: usize,
    n_shots: usize,
    marginal_qubits: &[usize],
    seed: Option<u64>,
) -> Result<BTreeMap<String, usize>> {
    for &qubit in marginal_qubits {
        if qubit >= n_qubits {
            return Err(QsvError::InvalidQubitIndex {
                index: qubit,
                n_qubits,
            });
        }
    }

    let memory = perform_measurements_as_memory(probabilities, n_shots, seed)?;
    let mut counts = BTreeMap::new();

    for index in memory {
        let mut bitstring: Vec<char> = state_index_to_bitstring(index, n_qubits, Endian::Little)
            .chars()
            .collect();
        for &qubit in marginal_qubits {
            bitstring[qubit] = 'x';
        }
        *counts
            .entry(bitstring.into_iter().collect::<String>())
            .or_insert(0) += 1;
    }

    Ok(counts)
}

/// Simulates a fresh copy of `state` through `circuit`, then samples
/// marginal counts from the final distribution.
///
/// Returns the classical register of the simulation run alongside the
/// counts.
#[allow(clippy::type_complexity)]
pub fn perform_measurements_as_counts_marginal_from_circuit(
    circuit: &Circuit,
    state: &Statevector,
    n_shots: usize,
    marginal_qubits: &[usize],
    noise: Option<&MeasurementNoise>,
    seed: Option<u64>,
) -> Result<(BTreeMap<String, usize>, ClassicalRegister)> {
    let mut working_state = state.clone();
    let mut simulator = match seed {
        Some(seed) => StatevectorSimulator::with_seed(seed),
        None => StatevectorSimulator::new(),
    };
    let register = simulator.run(circuit, &mut working_state)?;

    let counts = perform_measurements_as_counts_marginal(
        &working_state,
        n_shots,
        marginal_qubits,
        noise,
        seed,
    )?;

    Ok((counts, register))
}
