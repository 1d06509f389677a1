//! End-to-end simulation scenarios.
//!
//! These tests drive whole algorithms through the public API: state
//! preparation, simulation, measurement statistics, projection, and
//! expectation values together.

use num_complex::Complex64;
use qsv_core::math::Endian;
use qsv_core::prelude::*;
use qsv_rewrite::{apply_forward_fourier_transform, n_local, Entanglement};
use qsv_sim::{
    expectation_value_string, perform_measurements_as_counts,
    perform_measurements_as_counts_marginal, project_statevector, simulate, simulate_seeded,
    tensor_product, generate_random_state, Statevector,
};
use std::f64::consts::FRAC_1_SQRT_2;

#[test]
fn bell_pair_counts_cluster_near_even_split() {
    let mut circuit = Circuit::new(2);
    circuit.add_h_gate(0).unwrap();
    circuit.add_cx_gate(0, 1).unwrap();

    let mut state = Statevector::new(2);
    simulate(&circuit, &mut state).unwrap();

    assert!((state.amplitude(0b00).re - FRAC_1_SQRT_2).abs() < 1.0e-8);
    assert!((state.amplitude(0b11).re - FRAC_1_SQRT_2).abs() < 1.0e-8);

    let counts = perform_measurements_as_counts(&state, 1024, None, Some(5)).unwrap();
    let zeros = counts.get("00").copied().unwrap_or(0);
    let ones = counts.get("11").copied().unwrap_or(0);

    assert_eq!(zeros + ones, 1024);
    // within three sigma (sigma = 16) of 512 each
    assert!(zeros.abs_diff(512) < 48, "got {zeros} '00' shots");
    assert!(ones.abs_diff(512) < 48, "got {ones} '11' shots");
}

#[test]
fn deutsch_constant_one_oracle_reports_zero() {
    // query qubit 0, ancilla qubit 1, initial |01⟩ (qubit 1 set)
    let mut circuit = Circuit::new(2);
    circuit.add_h_gate(0).unwrap();
    circuit.add_h_gate(1).unwrap();
    circuit.add_x_gate(1).unwrap();
    circuit.add_h_gate(0).unwrap();

    let mut state = Statevector::from_bitstring("01", Endian::Little).unwrap();
    simulate(&circuit, &mut state).unwrap();

    // marginalizing the ancilla, the query bit is 0 with probability one
    let counts =
        perform_measurements_as_counts_marginal(&state, 512, &[1], None, Some(9)).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get("0x").copied().unwrap_or(0), 512);
}

#[test]
fn two_qubit_qft_produces_uniform_amplitudes() {
    let mut circuit = Circuit::new(2);
    apply_forward_fourier_transform(&mut circuit, &[0, 1]).unwrap();

    let mut state = Statevector::new(2);
    simulate(&circuit, &mut state).unwrap();

    for index in 0..4 {
        assert!((state.amplitude(index).re - 0.5).abs() < 1.0e-10);
        assert!(state.amplitude(index).im.abs() < 1.0e-10);
    }
}

#[test]
fn measurement_statistics_over_many_shots() {
    let mut circuit = Circuit::new(1);
    circuit.add_h_gate(0).unwrap();

    let mut state = Statevector::new(1);
    simulate(&circuit, &mut state).unwrap();

    let counts = perform_measurements_as_counts(&state, 100_000, None, Some(41)).unwrap();
    let zeros = counts.get("0").copied().unwrap_or(0) as f64 / 100_000.0;
    let ones = counts.get("1").copied().unwrap_or(0) as f64 / 100_000.0;

    assert!((zeros - 0.5).abs() < 0.05, "got {zeros}");
    assert!((ones - 0.5).abs() < 0.05, "got {ones}");
}

#[test]
fn quantum_teleportation_transfers_the_state() {
    for seed in [3u64, 17, 29] {
        // the state to teleport lives on qubit 0
        let payload = generate_random_state(1, Some(seed));
        let ancilla = Statevector::new(2);
        let initial = tensor_product(&payload, &ancilla);

        let mut x_correction = Circuit::new(3);
        x_correction.add_x_gate(2).unwrap();
        let mut z_correction = Circuit::new(3);
        z_correction.add_z_gate(2).unwrap();

        let mut circuit = Circuit::new(3);
        // entangle the carrier pair (1, 2)
        circuit.add_h_gate(1).unwrap();
        circuit.add_cx_gate(1, 2).unwrap();
        // Bell measurement of the payload against qubit 1
        circuit.add_cx_gate(0, 1).unwrap();
        circuit.add_h_gate(0).unwrap();
        circuit.add_m_gate(0).unwrap();
        circuit.add_m_gate(1).unwrap();
        // classically controlled corrections on the receiving qubit
        circuit
            .add_if_statement(ControlFlowPredicate::single(1, 1).unwrap(), x_correction)
            .unwrap();
        circuit
            .add_if_statement(ControlFlowPredicate::single(0, 1).unwrap(), z_correction)
            .unwrap();

        let mut state = initial.clone();
        let register = simulate_seeded(&circuit, &mut state, seed).unwrap();

        // project out the measured qubits; the payload sits on qubit 2
        let measured = [register.get(0).unwrap(), register.get(1).unwrap()];
        let received = project_statevector(&state, &[0, 1], &measured).unwrap();

        assert!(
            received.almost_eq(&payload),
            "teleportation failed for seed {seed}"
        );
    }
}

#[test]
fn ghz_state_counts_and_expectations() {
    let mut circuit = Circuit::new(3);
    circuit.add_h_gate(0).unwrap();
    circuit.add_cx_gate(0, 1).unwrap();
    circuit.add_cx_gate(1, 2).unwrap();

    let mut state = Statevector::new(3);
    simulate(&circuit, &mut state).unwrap();

    let counts = perform_measurements_as_counts(&state, 2048, None, Some(2)).unwrap();
    assert!(counts.keys().all(|key| key == "000" || key == "111"));

    // ⟨X⊗X⊗X⟩ = 1 on the GHZ state
    let mut xxx = SparsePauliString::new(3);
    xxx.add(0, PauliTerm::X).unwrap();
    xxx.add(1, PauliTerm::X).unwrap();
    xxx.add(2, PauliTerm::X).unwrap();
    let value = expectation_value_string(&xxx, &state).unwrap();
    assert!((value.re - 1.0).abs() < 1.0e-10);

    // ⟨Z⊗Z⊗I⟩ = 1, ⟨Z⊗I⊗I⟩ = 0
    let mut zz = SparsePauliString::new(3);
    zz.add(0, PauliTerm::Z).unwrap();
    zz.add(1, PauliTerm::Z).unwrap();
    let value = expectation_value_string(&zz, &state).unwrap();
    assert!((value.re - 1.0).abs() < 1.0e-10);

    let mut z = SparsePauliString::new(3);
    z.add(0, PauliTerm::Z).unwrap();
    let value = expectation_value_string(&z, &state).unwrap();
    assert!(value.norm() < 1.0e-10);
}

#[test]
fn n_local_ansatz_binds_and_simulates() {
    let (mut ansatz, parameter_ids) = n_local(
        2,
        &[Gate::RY],
        &[Gate::CX],
        Entanglement::Linear,
        1,
        true,
    )
    .unwrap();

    let angles = [0.4, -1.1];
    for (&id, &angle) in parameter_ids.iter().zip(&angles) {
        ansatz.set_parameter_value(id, angle).unwrap();
    }

    let mut from_ansatz = Statevector::new(2);
    simulate(&ansatz, &mut from_ansatz).unwrap();

    // the same circuit with the angles written inline
    let mut reference = Circuit::new(2);
    reference.add_ry_gate(0, angles[0]).unwrap();
    reference.add_ry_gate(1, angles[1]).unwrap();
    reference.add_cx_gate(0, 1).unwrap();

    let mut from_reference = Statevector::new(2);
    simulate(&reference, &mut from_reference).unwrap();

    assert!(from_ansatz.almost_eq(&from_reference));

    // rebinding moves the state on the next simulation
    for &id in &parameter_ids {
        ansatz.set_parameter_value(id, 0.0).unwrap();
    }
    let mut rebound = Statevector::new(2);
    simulate(&ansatz, &mut rebound).unwrap();
    assert!((rebound.amplitude(0).re - 1.0).abs() < 1.0e-10);
}

#[test]
fn norm_stays_one_through_long_random_circuit() {
    let mut circuit = Circuit::new(4);
    for layer in 0..6 {
        circuit.add_h_gate(layer % 4).unwrap();
        circuit.add_t_gate((layer + 1) % 4).unwrap();
        circuit
            .add_cx_gate(layer % 4, (layer + 2) % 4)
            .unwrap();
        circuit.add_rz_gate((layer + 3) % 4, 0.3 * layer as f64).unwrap();
    }

    let mut state = generate_random_state(4, Some(55));
    simulate(&circuit, &mut state).unwrap();
    assert!((state.norm_squared() - 1.0).abs() < 1.0e-8);
}

#[test]
fn projection_then_reembedding_restores_the_subspace() {
    // build |ψ⟩ = |φ⟩ ⊗ |1⟩ with the marker on qubit 1, project qubit 1,
    // re-embed, and compare
    let phi = generate_random_state(2, Some(61));

    // phi occupies qubits 0 and 2, with the marker qubit 1 pinned to |1⟩
    let embedded = {
        // amplitudes: index = φ-bit0 + 2·marker + 4·φ-bit1
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 8];
        for phi_index in 0..4 {
            let embedded_index = (phi_index & 1) + 2 + ((phi_index >> 1) << 2);
            amplitudes[embedded_index] = phi.amplitude(phi_index);
        }
        Statevector::from_amplitudes(amplitudes).unwrap()
    };

    let projected = project_statevector(&embedded, &[1], &[1]).unwrap();
    assert!(projected.almost_eq(&phi));

    // outside the marked subspace every amplitude is zero
    for index in 0..8 {
        if (index >> 1) & 1 == 0 {
            assert!(embedded.amplitude(index).norm() < 1.0e-12);
        }
    }
}
