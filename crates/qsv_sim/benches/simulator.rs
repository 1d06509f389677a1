//! Simulator benchmark.
//!
//! Measures per-gate sweep cost and whole-circuit simulation across qubit
//! counts for the sequential backend.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use qsv_core::prelude::*;
use qsv_sim::{simulate_seeded, Statevector};

fn create_layered_circuit(n_qubits: usize, n_layers: usize) -> Circuit {
    let mut circuit = Circuit::new(n_qubits);

    for layer in 0..n_layers {
        for qubit in 0..n_qubits {
            match (layer + qubit) % 4 {
                0 => circuit.add_h_gate(qubit).unwrap(),
                1 => circuit.add_t_gate(qubit).unwrap(),
                2 => circuit.add_rz_gate(qubit, 0.37).unwrap(),
                _ => circuit.add_sx_gate(qubit).unwrap(),
            }
        }
        for qubit in 0..n_qubits.saturating_sub(1) {
            circuit.add_cx_gate(qubit, qubit + 1).unwrap();
        }
    }

    circuit
}

fn bench_single_qubit_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_gates");

    for n_qubits in [4, 8, 12, 16] {
        let mut circuit = Circuit::new(n_qubits);
        circuit.add_h_gate(0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("H_gate", n_qubits),
            &n_qubits,
            |bencher, &n_qubits| {
                bencher.iter(|| {
                    let mut state = Statevector::new(n_qubits);
                    simulate_seeded(&circuit, &mut state, 0).unwrap();
                    state
                })
            },
        );
    }

    group.finish();
}

fn bench_double_qubit_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_qubit_gates");

    for n_qubits in [4, 8, 12, 16] {
        let mut circuit = Circuit::new(n_qubits);
        circuit.add_cx_gate(0, n_qubits - 1).unwrap();

        group.bench_with_input(
            BenchmarkId::new("CX_gate", n_qubits),
            &n_qubits,
            |bencher, &n_qubits| {
                bencher.iter(|| {
                    let mut state = Statevector::new(n_qubits);
                    simulate_seeded(&circuit, &mut state, 0).unwrap();
                    state
                })
            },
        );
    }

    group.finish();
}

fn bench_layered_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_circuits");

    for n_qubits in [4, 8, 12] {
        let circuit = create_layered_circuit(n_qubits, 8);

        group.bench_with_input(
            BenchmarkId::new("8_layers", n_qubits),
            &n_qubits,
            |bencher, &n_qubits| {
                bencher.iter(|| {
                    let mut state = Statevector::new(n_qubits);
                    simulate_seeded(&circuit, &mut state, 0).unwrap();
                    state
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_qubit_gates,
    bench_double_qubit_gates,
    bench_layered_circuits
);
criterion_main!(benches);
