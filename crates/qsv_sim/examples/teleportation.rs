//! Teleport a random single-qubit state with classically controlled
//! corrections.
//!
//! Run with: cargo run --example teleportation -p qsv_sim

use qsv_core::prelude::*;
use qsv_sim::{
    generate_random_state, project_statevector, simulate, tensor_product, Statevector,
};

fn main() -> Result<()> {
    let payload = generate_random_state(1, None);
    println!(
        "payload:  {:+.6} {:+.6}i |0⟩  {:+.6} {:+.6}i |1⟩",
        payload.amplitude(0).re,
        payload.amplitude(0).im,
        payload.amplitude(1).re,
        payload.amplitude(1).im,
    );

    let mut x_correction = Circuit::new(3);
    x_correction.add_x_gate(2)?;
    let mut z_correction = Circuit::new(3);
    z_correction.add_z_gate(2)?;

    let mut circuit = Circuit::new(3);
    circuit.add_h_gate(1)?;
    circuit.add_cx_gate(1, 2)?;
    circuit.add_cx_gate(0, 1)?;
    circuit.add_h_gate(0)?;
    circuit.add_m_gate(0)?;
    circuit.add_m_gate(1)?;
    circuit.add_if_statement(ControlFlowPredicate::single(1, 1)?, x_correction)?;
    circuit.add_if_statement(ControlFlowPredicate::single(0, 1)?, z_correction)?;

    let mut state = tensor_product(&payload, &Statevector::new(2));
    let register = simulate(&circuit, &mut state)?;
    println!("measured bits: {}", register.as_bitstring());

    let measured = [register.get(0)?, register.get(1)?];
    let received = project_statevector(&state, &[0, 1], &measured)?;
    println!(
        "received: {:+.6} {:+.6}i |0⟩  {:+.6} {:+.6}i |1⟩",
        received.amplitude(0).re,
        received.amplitude(0).im,
        received.amplitude(1).re,
        received.amplitude(1).im,
    );

    assert!(received.almost_eq(&payload));
    println!("payload arrived intact");

    Ok(())
}
