//! # QSV Simulator
//!
//! Dense statevector simulation backends for QSV.
//!
//! ## Modules
//! - **Statevector**: the amplitude vector value type with inner products,
//!   tensor products, random generation, and subspace projection.
//! - **StatevectorSimulator**: sequential element-stream simulation with
//!   measurement collapse and classical control flow.
//! - **MultithreadedStatevectorSimulator**: the same semantics on a
//!   barrier-synchronized worker team.
//! - **measure**: probability vectors, shot sampling, and count tallies.
//! - **pauli**: Pauli-string fast simulation and expectation values.
//!
//! ## Example
//!
//! ```rust
//! use qsv_core::prelude::*;
//! use qsv_sim::{simulate, Statevector};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.add_h_gate(0).unwrap();
//! circuit.add_cx_gate(0, 1).unwrap();
//!
//! let mut state = Statevector::new(2);
//! simulate(&circuit, &mut state).unwrap();
//!
//! assert!((state.amplitude(0).re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-10);
//! ```

mod kernel;

pub mod measure;
pub mod pairs;
pub mod pauli;
pub mod project;
pub mod random;
pub mod simulator;
pub mod statevector;
pub mod threaded;

pub use measure::{
    calculate_probabilities, memory_to_counts, memory_to_fractions,
    perform_measurements_as_counts, perform_measurements_as_counts_marginal,
    perform_measurements_as_counts_marginal_from_circuit,
    perform_measurements_as_counts_marginal_raw, perform_measurements_as_memory,
    perform_measurements_as_memory_from_state, ProbabilitySampler,
};
pub use pairs::{
    number_of_double_qubit_gate_pairs, number_of_single_qubit_gate_pairs,
    DoubleQubitGatePairGenerator, FlatIndexPair, SingleQubitGatePairGenerator,
};
pub use pauli::{expectation_value, expectation_value_string, simulate_pauli};
pub use project::project_statevector;
pub use random::generate_random_state;
pub use simulator::{simulate, simulate_seeded, SimulatorBackend, StatevectorSimulator};
pub use statevector::{inner_product, tensor_product, Statevector};
pub use threaded::{
    load_balanced_division, partition_pair_ranges, simulate_multithreaded,
    MultithreadedStatevectorSimulator,
};
