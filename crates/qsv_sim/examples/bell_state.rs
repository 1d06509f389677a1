//! Build and sample a Bell pair.
//!
//! Run with: cargo run --example bell_state -p qsv_sim

use qsv_core::prelude::*;
use qsv_sim::{perform_measurements_as_counts, simulate, Statevector};

fn main() -> Result<()> {
    let mut circuit = Circuit::new(2);
    circuit.add_h_gate(0)?;
    circuit.add_cx_gate(0, 1)?;

    println!("{circuit}");

    let mut state = Statevector::new(2);
    simulate(&circuit, &mut state)?;

    println!("final amplitudes:");
    for index in 0..state.n_states() {
        let amplitude = state.amplitude(index);
        println!("  |{index:02b}⟩  {:+.6} {:+.6}i", amplitude.re, amplitude.im);
    }

    let counts = perform_measurements_as_counts(&state, 1024, None, None)?;
    println!("counts over 1024 shots:");
    for (bitstring, count) in &counts {
        println!("  {bitstring}: {count}");
    }

    Ok(())
}
