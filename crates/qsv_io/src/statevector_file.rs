//! Human-readable statevector save/load format.
//!
//! ```text
//! ENDIANNESS: LITTLE
//! NUMBER OF STATES: 4
//!  0.70710678118655    0.00000000000000
//!  0.00000000000000    0.00000000000000
//!  0.00000000000000    0.00000000000000
//!  0.70710678118655    0.00000000000000
//! ```
//!
//! Components print in fixed point with 14 digits; non-negative values get
//! a leading space so the columns align with negative ones.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use num_complex::Complex64;

use qsv_core::math::{endian_flip, Endian};
use qsv_sim::Statevector;

use crate::error::{IoError, Result};

fn format_component(value: f64) -> String {
    if value >= 0.0 {
        format!(" {value:.14}")
    } else {
        format!("{value:.14}")
    }
}

fn endian_to_str(endian: Endian) -> &'static str {
    match endian {
        Endian::Little => "LITTLE",
        Endian::Big => "BIG",
    }
}

fn endian_from_str(text: &str) -> Result<Endian> {
    match text {
        "LITTLE" => Ok(Endian::Little),
        "BIG" => Ok(Endian::Big),
        other => Err(IoError::parse(1, format!("unknown endianness '{other}'"))),
    }
}

/// Writes a statevector in the text format, in the requested endianness.
pub fn save_statevector(
    writer: &mut impl Write,
    state: &Statevector,
    endian: Endian,
) -> Result<()> {
    writeln!(writer, "ENDIANNESS: {}", endian_to_str(endian))?;
    writeln!(writer, "NUMBER OF STATES: {}", state.n_states())?;

    for index in 0..state.n_states() {
        let amplitude = match endian {
            Endian::Little => state.amplitude(index),
            Endian::Big => state.amplitude(endian_flip(index, state.n_qubits())),
        };
        writeln!(
            writer,
            "{}   {}",
            format_component(amplitude.re),
            format_component(amplitude.im)
        )?;
    }

    Ok(())
}

/// Writes a statevector to a file.
pub fn save_statevector_to_path(
    path: impl AsRef<Path>,
    state: &Statevector,
    endian: Endian,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_statevector(&mut writer, state, endian)
}

/// Reads a statevector from the text format.
pub fn load_statevector(reader: &mut impl Read) -> Result<Statevector> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    load_statevector_from_str(&contents)
}

/// Reads a statevector from text.
pub fn load_statevector_from_str(contents: &str) -> Result<Statevector> {
    let tokens: Vec<&str> = contents.split_whitespace().collect();

    fn take<'a>(tokens: &[&'a str], position: usize, line: usize, what: &str) -> Result<&'a str> {
        tokens
            .get(position)
            .copied()
            .ok_or_else(|| IoError::parse(line, format!("missing {what}")))
    }

    take(&tokens, 0, 1, "ENDIANNESS header")?;
    let endian = endian_from_str(take(&tokens, 1, 1, "endianness value")?)?;

    take(&tokens, 2, 2, "NUMBER header")?;
    take(&tokens, 3, 2, "OF header")?;
    take(&tokens, 4, 2, "STATES header")?;
    let n_states: usize = take(&tokens, 5, 2, "state count")?
        .parse()
        .map_err(|_| IoError::parse(2, "state count is not an integer"))?;

    let mut amplitudes = Vec::with_capacity(n_states);
    for index in 0..n_states {
        let line = index + 3;
        let real: f64 = take(&tokens, 6 + 2 * index, line, "real component")?
            .parse()
            .map_err(|_| IoError::parse(line, "malformed real component"))?;
        let imag: f64 = take(&tokens, 7 + 2 * index, line, "imaginary component")?
            .parse()
            .map_err(|_| IoError::parse(line, "malformed imaginary component"))?;
        amplitudes.push(Complex64::new(real, imag));
    }

    Ok(Statevector::from_amplitudes_with_endian(amplitudes, endian)?)
}

/// Reads a statevector from a file.
pub fn load_statevector_from_path(path: impl AsRef<Path>) -> Result<Statevector> {
    let mut file = File::open(path)?;
    load_statevector(&mut file)
}
