//! The single-threaded statevector simulator.
//!
//! The simulator walks the circuit's element stream in order, mutating the
//! statevector in place. Measurement gates collapse the state and write the
//! outcome into the classical register; classical-control elements evaluate
//! their predicate against the live register and recurse into the owned
//! subcircuit with the same statevector and register.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use qsv_core::error::{QsvError, Result};
use qsv_core::math::PROBABILITY_CUTOFF;
use qsv_core::types::{Circuit, CircuitElement, ClassicalRegister, Gate};

use crate::kernel::{apply_resolved_gate_over_range, resolve_transform_gate};
use crate::pairs::{
    number_of_single_qubit_gate_pairs, FlatIndexPair, SingleQubitGatePairGenerator,
};
use crate::random::build_prng;
use crate::statevector::Statevector;

/// A simulation backend consuming (circuit, statevector) pairs.
///
/// Both the single-threaded and the multithreaded simulators implement this
/// trait, so callers can hold either behind the same seam.
pub trait SimulatorBackend {
    /// A short human-readable backend name.
    fn name(&self) -> &str;

    /// Runs the circuit against the state, returning the classical register.
    fn execute(
        &mut self,
        circuit: &Circuit,
        state: &mut Statevector,
    ) -> Result<ClassicalRegister>;
}

/// Sequential dense-statevector simulator.
pub struct StatevectorSimulator {
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Creates a simulator with a nondeterministic measurement PRNG.
    pub fn new() -> Self {
        Self {
            rng: build_prng(None),
        }
    }

    /// Creates a simulator with a seeded measurement PRNG.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: build_prng(Some(seed)),
        }
    }

    /// Simulates the circuit, mutating `state` in place.
    ///
    /// A fresh classical register of `circuit.n_bits()` is allocated for the
    /// run and returned with the measured bits filled in.
    pub fn run(&mut self, circuit: &Circuit, state: &mut Statevector) -> Result<ClassicalRegister> {
        if circuit.n_qubits() != state.n_qubits() {
            return Err(QsvError::SizeMismatch {
                expected: circuit.n_qubits(),
                found: state.n_qubits(),
            });
        }

        debug!(
            n_qubits = circuit.n_qubits(),
            n_elements = circuit.len(),
            "starting statevector simulation"
        );

        let mut register = ClassicalRegister::new(circuit.n_bits());
        self.run_elements_(circuit, state, &mut register)?;
        Ok(register)
    }

    fn run_elements_(
        &mut self,
        circuit: &Circuit,
        state: &mut Statevector,
        register: &mut ClassicalRegister,
    ) -> Result<()> {
        let n_qubits = state.n_qubits();
        let full_single_range =
            FlatIndexPair::new(0, number_of_single_qubit_gate_pairs(n_qubits));

        for element in circuit.elements() {
            match element {
                CircuitElement::Gate(info) if info.gate == Gate::M => {
                    let (qubit, bit) = info.qubit_bit();
                    let outcome = measure_and_collapse_qubit(
                        state.amplitudes_mut(),
                        n_qubits,
                        qubit,
                        &mut self.rng,
                    )?;
                    register.set(bit, outcome)?;
                }
                CircuitElement::Gate(info) => {
                    let resolved = resolve_transform_gate(info, circuit)?;
                    let range = match resolved.pairs {
                        crate::kernel::PairKind::Single { .. } => full_single_range,
                        crate::kernel::PairKind::Double { .. } => FlatIndexPair::new(
                            0,
                            crate::pairs::number_of_double_qubit_gate_pairs(n_qubits),
                        ),
                    };
                    apply_resolved_gate_over_range(
                        state.amplitudes_mut(),
                        &resolved,
                        n_qubits,
                        range,
                    );
                }
                CircuitElement::IfStatement(predicate, subcircuit) => {
                    if predicate.evaluate(register)? {
                        self.run_elements_(subcircuit, state, register)?;
                    }
                }
                CircuitElement::IfElseStatement(predicate, if_subcircuit, else_subcircuit) => {
                    if predicate.evaluate(register)? {
                        self.run_elements_(if_subcircuit, state, register)?;
                    } else {
                        self.run_elements_(else_subcircuit, state, register)?;
                    }
                }
                CircuitElement::Logger(_) => {}
            }
        }

        Ok(())
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorBackend for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector"
    }

    fn execute(
        &mut self,
        circuit: &Circuit,
        state: &mut Statevector,
    ) -> Result<ClassicalRegister> {
        self.run(circuit, state)
    }
}

/// Measures one qubit, collapses the state, and returns the outcome bit.
///
/// The two outcome probabilities are accumulated over the qubit's pair set;
/// the surviving amplitudes are rescaled by the inverse square root of the
/// selected probability. An outcome whose probability is below the
/// degeneracy cutoff is a fatal numerical failure.
pub(crate) fn measure_and_collapse_qubit(
    amplitudes: &mut [num_complex::Complex64],
    n_qubits: usize,
    qubit: usize,
    rng: &mut StdRng,
) -> Result<u8> {
    let mut generator = SingleQubitGatePairGenerator::new(qubit, n_qubits);
    let n_pairs = generator.size();

    let mut probability0 = 0.0;
    let mut probability1 = 0.0;
    for _ in 0..n_pairs {
        let (i0, i1) = generator.next_pair();
        probability0 += amplitudes[i0].norm_sqr();
        probability1 += amplitudes[i1].norm_sqr();
    }

    let outcome: u8 = if rng.gen::<f64>() < probability0 { 0 } else { 1 };
    let selected_probability = if outcome == 0 {
        probability0
    } else {
        probability1
    };

    if selected_probability < PROBABILITY_CUTOFF {
        return Err(QsvError::DegenerateMeasurement {
            probability: selected_probability,
        });
    }

    let scale = 1.0 / selected_probability.sqrt();
    generator.set_state(0);
    for _ in 0..n_pairs {
        let (i0, i1) = generator.next_pair();
        let (keep, zero) = if outcome == 0 { (i0, i1) } else { (i1, i0) };
        amplitudes[keep] *= scale;
        amplitudes[zero] = qsv_core::matrix::ZERO;
    }

    Ok(outcome)
}

/// Simulates the circuit with a nondeterministic measurement PRNG.
pub fn simulate(circuit: &Circuit, state: &mut Statevector) -> Result<ClassicalRegister> {
    StatevectorSimulator::new().run(circuit, state)
}

/// Simulates the circuit with a seeded measurement PRNG.
pub fn simulate_seeded(
    circuit: &Circuit,
    state: &mut Statevector,
    seed: u64,
) -> Result<ClassicalRegister> {
    StatevectorSimulator::with_seed(seed).run(circuit, state)
}
