//! Quantum phase estimation of a diagonal unitary.
//!
//! Estimates the eigenphase of P(θ) on its |1⟩ eigenvector with a
//! three-qubit counting register, using the naive binary-controlled
//! construction and the inverse Fourier transform.
//!
//! Run with: cargo run --example phase_estimation -p qsv_rewrite

use qsv_core::prelude::*;
use qsv_rewrite::{
    apply_inverse_fourier_transform, extend_circuit, make_binary_controlled_circuit_naive,
};
use qsv_sim::{perform_measurements_as_counts_marginal, simulate, Statevector};

const N_COUNTING: usize = 3;

fn main() -> Result<()> {
    // the phase to recover: 2π·(5/8), so the counting register reads 101
    let numerator = 5usize;
    let theta = std::f64::consts::TAU * numerator as f64 / (1 << N_COUNTING) as f64;

    let mut unitary = Circuit::new(1);
    unitary.add_p_gate(0, theta)?;

    // counter at list position i gates 2^i applications; listing the
    // counters high-to-low puts the most significant phase bit on counter 0
    let controls: Vec<usize> = (0..N_COUNTING).rev().collect();
    let controlled_powers = make_binary_controlled_circuit_naive(
        &unitary,
        N_COUNTING + 1,
        &controls,
        &[N_COUNTING],
    )?;

    let counters: Vec<usize> = (0..N_COUNTING).collect();
    let mut circuit = Circuit::new(N_COUNTING + 1);
    circuit.add_x_gate(N_COUNTING)?;
    circuit.add_h_gates(counters.iter().copied())?;
    extend_circuit(&mut circuit, &controlled_powers)?;
    apply_inverse_fourier_transform(&mut circuit, &counters)?;

    let mut state = Statevector::new(N_COUNTING + 1);
    simulate(&circuit, &mut state)?;

    // marginalize the eigenstate qubit; the counting register is definite
    let counts =
        perform_measurements_as_counts_marginal(&state, 256, &[N_COUNTING], None, None)?;
    println!("counting register over 256 shots (MSB first):");
    for (bitstring, count) in &counts {
        println!("  {bitstring}: {count}");
    }

    let recovered: usize = counts
        .keys()
        .next()
        .map(|bitstring| {
            bitstring
                .chars()
                .take(N_COUNTING)
                .fold(0, |acc, bit| (acc << 1) | usize::from(bit == '1'))
        })
        .unwrap_or(0);
    println!("estimated phase: 2π·{recovered}/{}", 1 << N_COUNTING);

    Ok(())
}
