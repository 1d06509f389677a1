//! Reader for tangelo-exported circuit files.
//!
//! One gate per line, with case-sensitive mnemonics:
//!
//! ```text
//! H      target : [4]
//! RX     target : [5]   parameter : 1.5707963267948966
//! CNOT   target : [4]   control : [2]
//! SWAP   target : [0, 1]
//! U      target : [1]
//!     [0.5, 0.5]  [0.5, -0.5]
//!     [0.5, -0.5]  [0.5, 0.5]
//! M      target : [0]   bit : [0]
//! ```
//!
//! `CNOT`, `CPHASE`, and `PHASE` are recognized as aliases of CX, CP, and P;
//! SWAP lowers to the standard three-CX pattern; U and CU read their 2x2
//! matrix from the two following rows.

use std::fs;
use std::path::Path;

use nom::{
    bytes::complete::tag,
    character::complete::{char, multispace0, space0},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use qsv_core::matrix::{c, Matrix2x2, C64};
use qsv_core::types::{Circuit, Gate};

use crate::error::{IoError, Result};

// --- Line-level nom pieces ---

fn usize_literal(input: &str) -> IResult<&str, usize> {
    nom::combinator::map_res(nom::character::complete::digit1, str::parse::<usize>)(input)
}

fn bracketed_index(input: &str) -> IResult<&str, usize> {
    delimited(
        tuple((char('['), space0)),
        usize_literal,
        tuple((space0, char(']'))),
    )(input)
}

fn bracketed_index_pair(input: &str) -> IResult<&str, (usize, usize)> {
    delimited(
        tuple((char('['), space0)),
        separated_pair(
            usize_literal,
            tuple((space0, char(','), space0)),
            usize_literal,
        ),
        tuple((space0, char(']'))),
    )(input)
}

fn keyword_field<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, ()> {
    move |input| {
        let (input, _) = preceded(space0, tag(keyword))(input)?;
        let (input, _) = tuple((space0, char(':'), space0))(input)?;
        Ok((input, ()))
    }
}

fn target_field(input: &str) -> IResult<&str, usize> {
    let (input, _) = keyword_field("target")(input)?;
    bracketed_index(input)
}

fn target_pair_field(input: &str) -> IResult<&str, (usize, usize)> {
    let (input, _) = keyword_field("target")(input)?;
    bracketed_index_pair(input)
}

fn control_field(input: &str) -> IResult<&str, usize> {
    let (input, _) = keyword_field("control")(input)?;
    bracketed_index(input)
}

fn bit_field(input: &str) -> IResult<&str, usize> {
    let (input, _) = keyword_field("bit")(input)?;
    bracketed_index(input)
}

fn parameter_field(input: &str) -> IResult<&str, f64> {
    let (input, _) = keyword_field("parameter")(input)?;
    double(input)
}

fn complex_entry(input: &str) -> IResult<&str, C64> {
    let (input, (re, im)) = delimited(
        tuple((char('['), space0)),
        separated_pair(double, tuple((space0, char(','), space0)), double),
        tuple((space0, char(']'))),
    )(input)?;
    Ok((input, c(re, im)))
}

fn matrix_row(input: &str) -> IResult<&str, (C64, C64)> {
    let (input, first) = preceded(multispace0, complex_entry)(input)?;
    let (input, second) = preceded(multispace0, complex_entry)(input)?;
    Ok((input, (first, second)))
}

// --- Mnemonic resolution ---

fn resolve_alias(name: &str) -> &str {
    match name {
        "CNOT" => "CX",
        "CPHASE" => "CP",
        "PHASE" => "P",
        other => other,
    }
}

fn mnemonic_to_gate(name: &str) -> Option<Gate> {
    Some(match name {
        "H" => Gate::H,
        "X" => Gate::X,
        "Y" => Gate::Y,
        "Z" => Gate::Z,
        "S" => Gate::S,
        "T" => Gate::T,
        "SX" => Gate::SX,
        "SDAG" => Gate::Sdag,
        "TDAG" => Gate::Tdag,
        "SXDAG" => Gate::SXdag,
        "RX" => Gate::RX,
        "RY" => Gate::RY,
        "RZ" => Gate::RZ,
        "P" => Gate::P,
        "CH" => Gate::CH,
        "CX" => Gate::CX,
        "CY" => Gate::CY,
        "CZ" => Gate::CZ,
        "CS" => Gate::CS,
        "CT" => Gate::CT,
        "CSX" => Gate::CSX,
        "CSDAG" => Gate::CSdag,
        "CTDAG" => Gate::CTdag,
        "CSXDAG" => Gate::CSXdag,
        "CRX" => Gate::CRX,
        "CRY" => Gate::CRY,
        "CRZ" => Gate::CRZ,
        "CP" => Gate::CP,
        "M" => Gate::M,
        _ => return None,
    })
}

// --- Reader ---

struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str, n_skip_lines: usize) -> Self {
        Self {
            lines: input.lines().collect(),
            position: n_skip_lines,
        }
    }

    /// The 1-indexed number of the line most recently taken.
    fn line_number(&self) -> usize {
        self.position
    }

    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.position).copied();
        if line.is_some() {
            self.position += 1;
        }
        line
    }
}

fn take_matrix(cursor: &mut LineCursor<'_>) -> Result<Matrix2x2> {
    let mut rows = [(c(0.0, 0.0), c(0.0, 0.0)); 2];

    for row in &mut rows {
        let line = cursor.next_line().ok_or_else(|| {
            IoError::parse(cursor.line_number(), "missing matrix row after U/CU gate")
        })?;
        let (_, parsed) = matrix_row(line).map_err(|_| {
            IoError::parse(
                cursor.line_number(),
                format!("malformed matrix row '{}'", line.trim()),
            )
        })?;
        *row = parsed;
    }

    Ok(Matrix2x2::new(rows[0].0, rows[0].1, rows[1].0, rows[1].1))
}

/// Parses a tangelo circuit from text.
///
/// The first `n_skip_lines` lines are discarded (tangelo exports often
/// carry a header); blank lines anywhere are ignored. Unknown mnemonics
/// abort with a parse error naming the gate.
pub fn read_tangelo_circuit(
    n_qubits: usize,
    input: &str,
    n_skip_lines: usize,
) -> Result<Circuit> {
    let mut circuit = Circuit::new(n_qubits);
    let mut cursor = LineCursor::new(input, n_skip_lines);

    while let Some(line) = cursor.next_line() {
        let line_number = cursor.line_number();
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }

        let (rest, raw_name) =
            nom::character::complete::alphanumeric1::<_, nom::error::Error<&str>>(trimmed)
                .map_err(|_| {
                    IoError::parse(line_number, format!("malformed gate line '{trimmed}'"))
                })?;
        let name = resolve_alias(raw_name);

        if name == "SWAP" {
            let (_, (qubit0, qubit1)) = target_pair_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed SWAP operands"))?;
            circuit.add_cx_gate(qubit0, qubit1)?;
            circuit.add_cx_gate(qubit1, qubit0)?;
            circuit.add_cx_gate(qubit0, qubit1)?;
            continue;
        }

        if name == "U" {
            let (_, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed U operands"))?;
            let matrix = take_matrix(&mut cursor)?;
            circuit.add_u_gate(matrix, target)?;
            continue;
        }

        if name == "CU" {
            let (rest, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed CU operands"))?;
            let (_, control) = control_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed CU operands"))?;
            let matrix = take_matrix(&mut cursor)?;
            circuit.add_cu_gate(matrix, control, target)?;
            continue;
        }

        let gate = mnemonic_to_gate(name).ok_or_else(|| {
            IoError::parse(line_number, format!("unknown gate '{raw_name}'"))
        })?;

        if gate == Gate::M {
            let (rest, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed M operands"))?;
            let (_, bit) = bit_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed M operands"))?;
            circuit.add_m_gate_to_bit(target, bit)?;
        } else if gate.is_one_target() {
            let (_, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            circuit.add_one_target_gate(gate, target)?;
        } else if gate.is_one_target_one_angle() {
            let (rest, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            let (_, angle) = parameter_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate parameter"))?;
            circuit.add_one_target_one_angle_gate(gate, target, angle)?;
        } else if gate.is_one_control_one_target() {
            let (rest, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            let (_, control) = control_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            circuit.add_one_control_one_target_gate(gate, control, target)?;
        } else {
            let (rest, target) = target_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            let (rest, control) = control_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate operands"))?;
            let (_, angle) = parameter_field(rest)
                .map_err(|_| IoError::parse(line_number, "malformed gate parameter"))?;
            circuit.add_one_control_one_target_one_angle_gate(gate, control, target, angle)?;
        }
    }

    Ok(circuit)
}

/// Reads a tangelo circuit from a file.
pub fn read_tangelo_circuit_from_path(
    n_qubits: usize,
    path: impl AsRef<Path>,
    n_skip_lines: usize,
) -> Result<Circuit> {
    let contents = fs::read_to_string(path)?;
    read_tangelo_circuit(n_qubits, &contents, n_skip_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_core::types::CircuitElement;

    fn kinds(circuit: &Circuit) -> Vec<Gate> {
        circuit
            .elements()
            .iter()
            .filter_map(CircuitElement::as_gate)
            .map(|info| info.gate)
            .collect()
    }

    #[test]
    fn test_one_target_gates() {
        let input = "H      target : [0]\nX      target : [2]\nSX     target : [1]\n";
        let circuit = read_tangelo_circuit(3, input, 0).unwrap();
        assert_eq!(kinds(&circuit), vec![Gate::H, Gate::X, Gate::SX]);
    }

    #[test]
    fn test_angle_gates() {
        let input = "RX     target : [1]   parameter : 1.5707963267948966\n";
        let circuit = read_tangelo_circuit(2, input, 0).unwrap();

        let info = circuit.elements()[0].as_gate().unwrap();
        assert_eq!(info.gate, Gate::RX);
        assert_eq!(info.target(), 1);
        assert!((info.angle - std::f64::consts::FRAC_PI_2).abs() < 1.0e-12);
    }

    #[test]
    fn test_cnot_alias_and_operand_order() {
        let input = "CNOT   target : [0]   control : [2]\n";
        let circuit = read_tangelo_circuit(3, input, 0).unwrap();

        let info = circuit.elements()[0].as_gate().unwrap();
        assert_eq!(info.gate, Gate::CX);
        assert_eq!(info.control_target(), (2, 0));
    }

    #[test]
    fn test_cphase_and_phase_aliases() {
        let input = "CPHASE target : [1]   control : [0]   parameter : 0.25\n\
                     PHASE  target : [0]   parameter : 0.5\n";
        let circuit = read_tangelo_circuit(2, input, 0).unwrap();
        assert_eq!(kinds(&circuit), vec![Gate::CP, Gate::P]);
    }

    #[test]
    fn test_swap_lowers_to_three_cx() {
        let input = "SWAP   target : [0, 1]\n";
        let circuit = read_tangelo_circuit(2, input, 0).unwrap();
        assert_eq!(kinds(&circuit), vec![Gate::CX, Gate::CX, Gate::CX]);

        let pairs: Vec<_> = circuit
            .elements()
            .iter()
            .filter_map(CircuitElement::as_gate)
            .map(|info| info.control_target())
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_u_gate_reads_matrix_rows() {
        let input = "U      target : [0]\n\
                     \x20   [0.5, 0.5]  [0.5, -0.5]\n\
                     \x20   [0.5, -0.5]  [0.5, 0.5]\n";
        let circuit = read_tangelo_circuit(1, input, 0).unwrap();

        let info = circuit.elements()[0].as_gate().unwrap();
        assert_eq!(info.gate, Gate::U);
        let matrix = circuit.matrix_at(info.matrix_slot).unwrap();
        assert!(matrix.almost_eq(&qsv_core::matrix::gates::SX));
    }

    #[test]
    fn test_cu_gate_reads_operands_and_matrix() {
        let input = "CU     target : [1]   control : [0]\n\
                     \x20   [1.0, 0.0]  [0.0, 0.0]\n\
                     \x20   [0.0, 0.0]  [0.0, 1.0]\n";
        let circuit = read_tangelo_circuit(2, input, 0).unwrap();

        let info = circuit.elements()[0].as_gate().unwrap();
        assert_eq!(info.gate, Gate::CU);
        assert_eq!(info.control_target(), (0, 1));
        assert!(circuit
            .matrix_at(info.matrix_slot)
            .unwrap()
            .almost_eq(&qsv_core::matrix::gates::S));
    }

    #[test]
    fn test_measurement_reads_bit() {
        let input = "M      target : [1]   bit : [0]\n";
        let circuit = read_tangelo_circuit(2, input, 0).unwrap();

        let info = circuit.elements()[0].as_gate().unwrap();
        assert_eq!(info.gate, Gate::M);
        assert_eq!(info.qubit_bit(), (1, 0));
    }

    #[test]
    fn test_unknown_gate_aborts_with_name() {
        let input = "FROB   target : [0]\n";
        match read_tangelo_circuit(1, input, 0) {
            Err(IoError::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("FROB"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_lines_and_blank_lines() {
        let input = "circuit header\n\nH      target : [0]\n\n";
        let circuit = read_tangelo_circuit(1, input, 1).unwrap();
        assert_eq!(kinds(&circuit), vec![Gate::H]);
    }

    #[test]
    fn test_out_of_range_operand_surfaces_core_error() {
        let input = "H      target : [5]\n";
        assert!(matches!(
            read_tangelo_circuit(2, input, 0),
            Err(IoError::Core(_))
        ));
    }

    #[test]
    fn test_missing_matrix_row_is_parse_error() {
        let input = "U      target : [0]\n\x20   [1.0, 0.0]  [0.0, 0.0]\n";
        assert!(matches!(
            read_tangelo_circuit(1, input, 0),
            Err(IoError::Parse { .. })
        ));
    }
}
