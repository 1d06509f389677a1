//! Reader for Pauli operator files.
//!
//! One weighted Pauli string per line:
//!
//! ```text
//! 0.25 0.0   :   (0, X)   (2, Z)
//! -1.0 0.5   :
//! ```
//!
//! The line's leading pair is the complex coefficient; each parenthesized
//! pair is a (qubit, Pauli) factor. A line with no factors denotes the
//! identity times the coefficient.

use std::fs;
use std::path::Path;

use nom::{
    character::complete::{char, one_of, space0},
    multi::many0,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use num_complex::Complex64;

use qsv_core::types::{PauliOperator, PauliTerm, SparsePauliString};

use crate::error::{IoError, Result};

fn usize_literal(input: &str) -> IResult<&str, usize> {
    nom::combinator::map_res(nom::character::complete::digit1, str::parse::<usize>)(input)
}

fn pauli_factor(input: &str) -> IResult<&str, (usize, PauliTerm)> {
    let (input, (qubit, letter)) = delimited(
        tuple((char('('), space0)),
        separated_pair(
            usize_literal,
            tuple((space0, char(','), space0)),
            one_of("XYZ"),
        ),
        tuple((space0, char(')'))),
    )(input)?;

    let term = match letter {
        'X' => PauliTerm::X,
        'Y' => PauliTerm::Y,
        _ => PauliTerm::Z,
    };
    Ok((input, (qubit, term)))
}

fn pauli_line(input: &str) -> IResult<&str, (Complex64, Vec<(usize, PauliTerm)>)> {
    let (input, real) = preceded(space0, double)(input)?;
    let (input, imag) = preceded(space0, double)(input)?;
    let (input, _) = tuple((space0, char(':')))(input)?;
    let (input, factors) = many0(preceded(space0, pauli_factor))(input)?;
    Ok((input, (Complex64::new(real, imag), factors)))
}

/// Parses a Pauli operator over `n_qubits` from text.
pub fn read_pauli_operator(input: &str, n_qubits: usize) -> Result<PauliOperator> {
    let mut operator = PauliOperator::new(n_qubits);

    for (line_index, line) in input.lines().enumerate() {
        let line_number = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let (rest, (coefficient, factors)) = pauli_line(line).map_err(|_| {
            IoError::parse(
                line_number,
                format!("malformed Pauli operator line '{}'", line.trim()),
            )
        })?;
        if !rest.trim().is_empty() {
            return Err(IoError::parse(
                line_number,
                format!("trailing content '{}' after Pauli terms", rest.trim()),
            ));
        }

        let mut pauli_string = SparsePauliString::new(n_qubits);
        for (qubit, term) in factors {
            pauli_string.add(qubit, term)?;
        }
        operator.add(coefficient, pauli_string)?;
    }

    Ok(operator)
}

/// Reads a Pauli operator from a file.
pub fn read_pauli_operator_from_path(
    path: impl AsRef<Path>,
    n_qubits: usize,
) -> Result<PauliOperator> {
    let contents = fs::read_to_string(path)?;
    read_pauli_operator(&contents, n_qubits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_weighted_strings() {
        let input = "0.25 0.0   :   (0, X)   (2, Z)\n0.5 -0.5   :   (1, Y)\n";
        let operator = read_pauli_operator(input, 3).unwrap();

        assert_eq!(operator.len(), 2);

        let first = &operator.terms()[0];
        assert!((first.coefficient.re - 0.25).abs() < 1.0e-12);
        assert_eq!(first.pauli_string.at(0), PauliTerm::X);
        assert_eq!(first.pauli_string.at(2), PauliTerm::Z);
        assert_eq!(first.pauli_string.at(1), PauliTerm::I);

        let second = &operator.terms()[1];
        assert!((second.coefficient.im + 0.5).abs() < 1.0e-12);
        assert_eq!(second.pauli_string.at(1), PauliTerm::Y);
    }

    #[test]
    fn test_bare_coefficient_is_identity_term() {
        let input = "-1.0 0.5 :\n";
        let operator = read_pauli_operator(input, 2).unwrap();

        assert_eq!(operator.len(), 1);
        assert_eq!(operator.terms()[0].pauli_string.weight(), 0);
        assert!((operator.terms()[0].coefficient.re + 1.0).abs() < 1.0e-12);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "\n1.0 0.0 : (0, Z)\n\n";
        let operator = read_pauli_operator(input, 1).unwrap();
        assert_eq!(operator.len(), 1);
    }

    #[test]
    fn test_malformed_line_fails_with_number() {
        let input = "1.0 0.0 : (0, Q)\n";
        match read_pauli_operator(input, 1) {
            Err(IoError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_qubit_surfaces_core_error() {
        let input = "1.0 0.0 : (5, X)\n";
        assert!(matches!(
            read_pauli_operator(input, 2),
            Err(IoError::Core(_))
        ));
    }
}
