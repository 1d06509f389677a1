//! QSV CLI - dense statevector circuit simulation from the command line.
//!
//! Provides commands for:
//! - Running tangelo circuit files against a fresh or saved statevector
//! - Sampling measurement counts from a saved statevector
//! - Evaluating Pauli operator expectation values

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use qsv_core::math::Endian;
use qsv_io::{
    load_statevector_from_path, read_pauli_operator_from_path, read_tangelo_circuit_from_path,
    save_statevector_to_path,
};
use qsv_noise::MeasurementNoise;
use qsv_rewrite::{transpile_to_primitive, DECOMPOSITION_TOLERANCE};
use qsv_sim::{
    expectation_value, perform_measurements_as_counts, simulate_multithreaded, simulate_seeded,
    Statevector, StatevectorSimulator,
};

/// QSV - dense statevector quantum circuit simulator.
#[derive(Parser)]
#[command(name = "qsv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a tangelo circuit file and print measurement counts
    Run {
        /// Path to the circuit file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of qubits in the circuit
        #[arg(short, long)]
        qubits: usize,

        /// Header lines to skip in the circuit file
        #[arg(long, default_value = "0")]
        skip_lines: usize,

        /// Number of sampling shots
        #[arg(short, long, default_value = "1024")]
        shots: usize,

        /// Measurement PRNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (1 runs the sequential simulator)
        #[arg(short, long, default_value = "1")]
        threads: usize,

        /// Rewrite U/CU gates to primitive gates before simulating
        #[arg(long)]
        transpile: bool,

        /// Uniform readout bit-flip probability applied when sampling
        #[arg(long)]
        readout_noise: Option<f64>,

        /// Save the final statevector to this path
        #[arg(long)]
        save_state: Option<PathBuf>,
    },

    /// Sample measurement counts from a saved statevector
    Sample {
        /// Path to the statevector file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of sampling shots
        #[arg(short, long, default_value = "1024")]
        shots: usize,

        /// Sampling PRNG seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate a Pauli operator expectation value on a saved statevector
    Expect {
        /// Path to the statevector file
        #[arg(value_name = "STATE")]
        state: PathBuf,

        /// Path to the Pauli operator file
        #[arg(value_name = "OPERATOR")]
        operator: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    match cli.command {
        Commands::Run {
            input,
            qubits,
            skip_lines,
            shots,
            seed,
            threads,
            transpile,
            readout_noise,
            save_state,
        } => run_circuit(RunArgs {
            input,
            qubits,
            skip_lines,
            shots,
            seed,
            threads,
            transpile,
            readout_noise,
            save_state,
        }),
        Commands::Sample { input, shots, seed } => sample_statevector(input, shots, seed),
        Commands::Expect { state, operator } => expect_operator(state, operator),
    }
}

struct RunArgs {
    input: PathBuf,
    qubits: usize,
    skip_lines: usize,
    shots: usize,
    seed: Option<u64>,
    threads: usize,
    transpile: bool,
    readout_noise: Option<f64>,
    save_state: Option<PathBuf>,
}

fn run_circuit(args: RunArgs) -> Result<()> {
    let mut circuit = read_tangelo_circuit_from_path(args.qubits, &args.input, args.skip_lines)
        .with_context(|| format!("failed to read circuit from {}", args.input.display()))?;
    info!(
        n_qubits = args.qubits,
        n_elements = circuit.len(),
        "loaded circuit"
    );

    if args.transpile {
        circuit = transpile_to_primitive(&circuit, DECOMPOSITION_TOLERANCE)?;
        info!(n_elements = circuit.len(), "transpiled to primitive gates");
    }

    let mut state = Statevector::new(args.qubits);
    let register = if args.threads > 1 {
        simulate_multithreaded(&circuit, &mut state, args.threads, args.seed)?
    } else {
        match args.seed {
            Some(seed) => simulate_seeded(&circuit, &mut state, seed)?,
            None => StatevectorSimulator::new().run(&circuit, &mut state)?,
        }
    };

    if register.as_bitstring().chars().any(|bit| bit != '-') {
        println!("classical register: {}", register.as_bitstring());
    }

    let noise = args
        .readout_noise
        .map(|probability| MeasurementNoise::uniform(args.qubits, probability))
        .transpose()?;
    let counts =
        perform_measurements_as_counts(&state, args.shots, noise.as_ref(), args.seed)?;
    println!("counts over {} shots:", args.shots);
    for (bitstring, count) in &counts {
        println!("  {bitstring}: {count}");
    }

    if let Some(path) = args.save_state {
        save_statevector_to_path(&path, &state, Endian::Little)
            .with_context(|| format!("failed to save statevector to {}", path.display()))?;
        info!(path = %path.display(), "saved final statevector");
    }

    Ok(())
}

fn sample_statevector(input: PathBuf, shots: usize, seed: Option<u64>) -> Result<()> {
    let state = load_statevector_from_path(&input)
        .with_context(|| format!("failed to load statevector from {}", input.display()))?;
    info!(n_qubits = state.n_qubits(), "loaded statevector");

    let counts = perform_measurements_as_counts(&state, shots, None, seed)?;
    println!("counts over {shots} shots:");
    for (bitstring, count) in &counts {
        println!("  {bitstring}: {count}");
    }

    Ok(())
}

fn expect_operator(state_path: PathBuf, operator_path: PathBuf) -> Result<()> {
    let state = load_statevector_from_path(&state_path)
        .with_context(|| format!("failed to load statevector from {}", state_path.display()))?;
    let operator = read_pauli_operator_from_path(&operator_path, state.n_qubits())
        .with_context(|| {
            format!(
                "failed to read Pauli operator from {}",
                operator_path.display()
            )
        })?;

    let value = expectation_value(&operator, &state)?;
    println!("expectation value: {:+.12} {:+.12}i", value.re, value.im);

    Ok(())
}
