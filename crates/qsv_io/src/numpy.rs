//! Reader for numpy-style statevector dumps.
//!
//! The first whitespace-separated token is the qubit count; the next `2^n`
//! tokens are complex literals of the form `(0.70710678+0.00000000j)`.

use std::fs;
use std::path::Path;

use nom::{
    character::complete::{char, multispace0},
    number::complete::double,
    sequence::{delimited, pair, preceded},
    IResult,
};
use num_complex::Complex64;

use qsv_core::math::{pow_2_int, Endian};
use qsv_sim::Statevector;

use crate::error::{IoError, Result};

fn usize_literal(input: &str) -> IResult<&str, usize> {
    nom::combinator::map_res(nom::character::complete::digit1, str::parse::<usize>)(input)
}

fn complex_literal(input: &str) -> IResult<&str, Complex64> {
    let (input, (re, im)) = delimited(
        char('('),
        pair(double, double),
        pair(char('j'), char(')')),
    )(input)?;
    Ok((input, Complex64::new(re, im)))
}

/// Parses a numpy statevector dump, interpreting its amplitude order in the
/// given endianness.
pub fn read_numpy_statevector(input: &str, input_endian: Endian) -> Result<Statevector> {
    let input = input.trim_start();
    let (rest, n_qubits) = usize_literal(input).map_err(|_: nom::Err<nom::error::Error<&str>>| {
        IoError::parse(1, "missing qubit count at start of numpy statevector")
    })?;

    let n_states = pow_2_int(n_qubits);
    let mut amplitudes = Vec::with_capacity(n_states);
    let mut remaining = rest;

    for index in 0..n_states {
        let (rest, amplitude) = preceded(multispace0, complex_literal)(remaining)
            .map_err(|_: nom::Err<nom::error::Error<&str>>| {
                IoError::parse(1, format!("malformed complex literal at entry {index}"))
            })?;
        amplitudes.push(amplitude);
        remaining = rest;
    }

    Ok(Statevector::from_amplitudes_with_endian(
        amplitudes,
        input_endian,
    )?)
}

/// Reads a numpy statevector dump from a file.
pub fn read_numpy_statevector_from_path(
    path: impl AsRef<Path>,
    input_endian: Endian,
) -> Result<Statevector> {
    let contents = fs::read_to_string(path)?;
    read_numpy_statevector(&contents, input_endian)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_basis_state() {
        let input = "2\n(0+0j) (1+0j) (0+0j) (0+0j)\n";
        let state = read_numpy_statevector(input, Endian::Little).unwrap();
        assert_eq!(state.n_qubits(), 2);
        assert!((state.amplitude(1).re - 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn test_reads_negative_and_exponent_forms() {
        let input = "1\n(7.07106781e-01+0j) (-7.07106781e-01-0j)\n";
        let state = read_numpy_statevector(input, Endian::Little).unwrap();
        assert!((state.amplitude(0).re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1.0e-8);
        assert!((state.amplitude(1).re + std::f64::consts::FRAC_1_SQRT_2).abs() < 1.0e-8);
    }

    #[test]
    fn test_big_endian_reordering() {
        // big-endian entry 1 is qubit 1 set, which is little-endian index 2
        let input = "2\n(0+0j) (1+0j) (0+0j) (0+0j)\n";
        let state = read_numpy_statevector(input, Endian::Big).unwrap();
        assert!((state.amplitude(2).re - 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn test_imaginary_parts() {
        let input = "1\n(0+0.6j) (0.8+0j)\n";
        let state = read_numpy_statevector(input, Endian::Little).unwrap();
        assert!((state.amplitude(0).im - 0.6).abs() < 1.0e-12);
        assert!((state.amplitude(1).re - 0.8).abs() < 1.0e-12);
    }

    #[test]
    fn test_truncated_input_fails() {
        let input = "2\n(1+0j) (0+0j)\n";
        assert!(matches!(
            read_numpy_statevector(input, Endian::Little),
            Err(IoError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_header_fails() {
        assert!(read_numpy_statevector("(1+0j)", Endian::Little).is_err());
    }
}
