//! The multithreaded statevector simulator.
//!
//! A fixed team of worker threads is spawned at `run` entry and joined on
//! exit. The coordinator (the calling thread) walks the element stream; for
//! each transform gate it publishes a resolved `(pair kind, matrix)` work
//! item and the team sweeps the gate's pair set, each worker owning a
//! pre-partitioned contiguous range. Two barrier phases per element separate
//! publish, worker sweep, and the coordinator's serial step, so the element
//! stream keeps its sequential semantics.
//!
//! Measurements, predicate evaluation, parameter reads, and register writes
//! all run on the coordinator between barriers, while the workers are parked.
//!
//! The amplitude array is shared through a raw pointer. Disjointness of the
//! worker writes follows from the generator index calculus: for a fixed gate
//! the flat pair ranges partition the pair set, and distinct pairs touch
//! distinct amplitude indices.

use std::sync::{Barrier, RwLock};

use num_complex::Complex64;
use rand::rngs::StdRng;
use tracing::debug;

use qsv_core::error::{QsvError, Result};
use qsv_core::types::{Circuit, CircuitElement, ClassicalRegister, Gate};

use crate::kernel::{resolve_transform_gate, PairKind, ResolvedGate};
use crate::pairs::{
    number_of_double_qubit_gate_pairs, number_of_single_qubit_gate_pairs,
    DoubleQubitGatePairGenerator, FlatIndexPair, SingleQubitGatePairGenerator,
};
use crate::random::build_prng;
use crate::simulator::{measure_and_collapse_qubit, SimulatorBackend};
use crate::statevector::Statevector;

/// Splits `numerator` units across `denominator` workers, giving the first
/// `numerator % denominator` workers one extra unit each.
pub fn load_balanced_division(numerator: usize, denominator: usize) -> Result<Vec<usize>> {
    if denominator == 0 {
        return Err(QsvError::simulation(
            "cannot perform load balancing division among 0 threads",
        ));
    }

    let remainder = numerator % denominator;
    let divisor = numerator / denominator;

    let mut output = vec![divisor; denominator];
    for split in output.iter_mut().take(remainder) {
        *split += 1;
    }

    Ok(output)
}

/// Converts per-worker unit counts into contiguous `[i_lower, i_upper)` ranges.
pub fn partition_pair_ranges(n_pairs: usize, n_threads: usize) -> Result<Vec<FlatIndexPair>> {
    let splits = load_balanced_division(n_pairs, n_threads)?;

    let mut output = Vec::with_capacity(splits.len());
    let mut i_lower = 0usize;
    for split in splits {
        output.push(FlatIndexPair::new(i_lower, i_lower + split));
        i_lower += split;
    }

    Ok(output)
}

/// One gate's worth of work, published by the coordinator.
#[derive(Debug, Clone, Copy)]
enum WorkItem {
    Idle,
    Gate(ResolvedGate),
    Done,
}

/// Raw shared view of the amplitude array.
///
/// Workers write through this pointer only inside their own pair range of
/// the currently published gate, and only between the two barrier phases of
/// that gate; the coordinator touches the array only while the workers are
/// parked at a barrier.
struct SharedAmplitudes {
    ptr: *mut Complex64,
    len: usize,
}

unsafe impl Send for SharedAmplitudes {}
unsafe impl Sync for SharedAmplitudes {}

impl SharedAmplitudes {
    fn new(amplitudes: &mut [Complex64]) -> Self {
        Self {
            ptr: amplitudes.as_mut_ptr(),
            len: amplitudes.len(),
        }
    }

    /// Applies a 2x2 matrix to the pair `(i0, i1)`.
    ///
    /// # Safety
    /// The caller must guarantee no concurrent access to `i0` or `i1`.
    unsafe fn apply_matrix_pair(&self, i0: usize, i1: usize, gate: &ResolvedGate) {
        debug_assert!(i0 < self.len && i1 < self.len);
        let a0 = *self.ptr.add(i0);
        let a1 = *self.ptr.add(i1);
        *self.ptr.add(i0) = gate.matrix.elem00 * a0 + gate.matrix.elem01 * a1;
        *self.ptr.add(i1) = gate.matrix.elem10 * a0 + gate.matrix.elem11 * a1;
    }

    /// Reconstructs the full mutable slice for the coordinator's serial steps.
    ///
    /// # Safety
    /// The caller must guarantee every worker is parked at a barrier for the
    /// whole lifetime of the returned slice.
    #[allow(clippy::mut_from_ref)]
    unsafe fn as_full_slice(&self) -> &mut [Complex64] {
        std::slice::from_raw_parts_mut(self.ptr, self.len)
    }
}

fn worker_loop(
    shared: &SharedAmplitudes,
    work: &RwLock<WorkItem>,
    barrier: &Barrier,
    n_qubits: usize,
    single_range: FlatIndexPair,
    double_range: FlatIndexPair,
) {
    loop {
        barrier.wait();
        let item = *work.read().expect("work lock never poisons");

        match item {
            WorkItem::Done => break,
            WorkItem::Idle => {}
            WorkItem::Gate(gate) => match gate.pairs {
                PairKind::Single { target } => {
                    let mut generator = SingleQubitGatePairGenerator::new(target, n_qubits);
                    generator.set_state(single_range.i_lower);
                    for _ in single_range.i_lower..single_range.i_upper {
                        let (i0, i1) = generator.next_pair();
                        // SAFETY: flat pair ranges partition the pair set and
                        // distinct pairs touch distinct indices, so no other
                        // worker writes these amplitudes during this element.
                        unsafe { shared.apply_matrix_pair(i0, i1, &gate) };
                    }
                }
                PairKind::Double { control, target } => {
                    let mut generator =
                        DoubleQubitGatePairGenerator::new(control, target, n_qubits);
                    generator.set_state(double_range.i_lower);
                    for _ in double_range.i_lower..double_range.i_upper {
                        let (i0, i1) = generator.next_pair();
                        // SAFETY: as above.
                        unsafe { shared.apply_matrix_pair(i0, i1, &gate) };
                    }
                }
            },
        }

        barrier.wait();
    }
}

/// Dense-statevector simulator with a barrier-synchronized worker team.
///
/// Functionally equivalent to [`crate::StatevectorSimulator`]; observable
/// floating-point differences stay within the usual test tolerances. The
/// measurement PRNG lives on the coordinator, so outcomes are deterministic
/// given (seed, circuit, initial state, thread count).
pub struct MultithreadedStatevectorSimulator {
    n_threads: usize,
    rng: StdRng,
}

impl MultithreadedStatevectorSimulator {
    /// Creates a simulator with a nondeterministic measurement PRNG.
    pub fn new(n_threads: usize) -> Self {
        assert!(n_threads >= 1, "the worker team needs at least one thread");
        Self {
            n_threads,
            rng: build_prng(None),
        }
    }

    /// Creates a simulator with a seeded measurement PRNG.
    pub fn with_seed(n_threads: usize, seed: u64) -> Self {
        assert!(n_threads >= 1, "the worker team needs at least one thread");
        Self {
            n_threads,
            rng: build_prng(Some(seed)),
        }
    }

    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Simulates the circuit, mutating `state` in place.
    pub fn run(&mut self, circuit: &Circuit, state: &mut Statevector) -> Result<ClassicalRegister> {
        if circuit.n_qubits() != state.n_qubits() {
            return Err(QsvError::SizeMismatch {
                expected: circuit.n_qubits(),
                found: state.n_qubits(),
            });
        }

        let n_qubits = state.n_qubits();
        let single_ranges =
            partition_pair_ranges(number_of_single_qubit_gate_pairs(n_qubits), self.n_threads)?;
        let double_ranges =
            partition_pair_ranges(number_of_double_qubit_gate_pairs(n_qubits), self.n_threads)?;

        debug!(
            n_qubits,
            n_threads = self.n_threads,
            "starting multithreaded statevector simulation"
        );

        let mut register = ClassicalRegister::new(circuit.n_bits());
        let barrier = Barrier::new(self.n_threads + 1);
        let work = RwLock::new(WorkItem::Idle);
        let shared = SharedAmplitudes::new(state.amplitudes_mut());
        let rng = &mut self.rng;

        let run_result = std::thread::scope(|scope| {
            for i_thread in 0..self.n_threads {
                let shared = &shared;
                let work = &work;
                let barrier = &barrier;
                let single_range = single_ranges[i_thread];
                let double_range = double_ranges[i_thread];
                scope.spawn(move || {
                    worker_loop(shared, work, barrier, n_qubits, single_range, double_range);
                });
            }

            let result =
                run_elements_(circuit, &shared, n_qubits, &mut register, rng, &work, &barrier);

            // release the team whether or not the walk succeeded
            *work.write().expect("work lock never poisons") = WorkItem::Done;
            barrier.wait();

            result
        });

        run_result?;
        Ok(register)
    }
}

impl SimulatorBackend for MultithreadedStatevectorSimulator {
    fn name(&self) -> &str {
        "statevector-multithreaded"
    }

    fn execute(
        &mut self,
        circuit: &Circuit,
        state: &mut Statevector,
    ) -> Result<ClassicalRegister> {
        self.run(circuit, state)
    }
}

/// Coordinator-side walk of one circuit's element stream.
fn run_elements_(
    circuit: &Circuit,
    shared: &SharedAmplitudes,
    n_qubits: usize,
    register: &mut ClassicalRegister,
    rng: &mut StdRng,
    work: &RwLock<WorkItem>,
    barrier: &Barrier,
) -> Result<()> {
    for element in circuit.elements() {
        match element {
            CircuitElement::Gate(info) if info.gate == Gate::M => {
                let (qubit, bit) = info.qubit_bit();
                // SAFETY: every worker is parked at the next start barrier.
                let amplitudes = unsafe { shared.as_full_slice() };
                let outcome = measure_and_collapse_qubit(amplitudes, n_qubits, qubit, rng)?;
                register.set(bit, outcome)?;
            }
            CircuitElement::Gate(info) => {
                let resolved = resolve_transform_gate(info, circuit)?;
                *work.write().expect("work lock never poisons") = WorkItem::Gate(resolved);
                barrier.wait();
                // the team sweeps its ranges here
                barrier.wait();
            }
            CircuitElement::IfStatement(predicate, subcircuit) => {
                if predicate.evaluate(register)? {
                    run_elements_(subcircuit, shared, n_qubits, register, rng, work, barrier)?;
                }
            }
            CircuitElement::IfElseStatement(predicate, if_subcircuit, else_subcircuit) => {
                let branch = if predicate.evaluate(register)? {
                    if_subcircuit
                } else {
                    else_subcircuit
                };
                run_elements_(branch, shared, n_qubits, register, rng, work, barrier)?;
            }
            CircuitElement::Logger(_) => {}
        }
    }

    Ok(())
}

/// Simulates the circuit on a fixed team of `n_threads` workers.
pub fn simulate_multithreaded(
    circuit: &Circuit,
    state: &mut Statevector,
    n_threads: usize,
    seed: Option<u64>,
) -> Result<ClassicalRegister> {
    let mut simulator = match seed {
        Some(seed) => MultithreadedStatevectorSimulator::with_seed(n_threads, seed),
        None => MultithreadedStatevectorSimulator::new(n_threads),
    };
    simulator.run(circuit, state)
}
