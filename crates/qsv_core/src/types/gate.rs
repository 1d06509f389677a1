//! Gate kinds and the packed per-gate record.
//!
//! Every circuit element that is a gate carries a [`GateInfo`]: the gate
//! kind plus three operand slots interpreted per kind. The record is sized
//! for the largest gate family; the unused slots of smaller families hold
//! zeroes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::GATE_ANGLE_TOLERANCE;
use crate::matrix::{gates, Matrix2x2};
use crate::types::parameter::ParameterId;

/// Quantum gate kinds.
///
/// Single-target: H, X, Y, Z, S, T, SX and their daggers; the four rotation
/// kinds RX, RY, RZ, P carry an angle. Every single-target kind has a
/// controlled counterpart. U and CU reference a 2x2 matrix owned by the
/// circuit; M is a measurement into a classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    H,
    X,
    Y,
    Z,
    S,
    T,
    SX,
    Sdag,
    Tdag,
    SXdag,
    RX,
    RY,
    RZ,
    P,
    CH,
    CX,
    CY,
    CZ,
    CS,
    CT,
    CSX,
    CSdag,
    CTdag,
    CSXdag,
    CRX,
    CRY,
    CRZ,
    CP,
    U,
    CU,
    M,
}

impl Gate {
    /// One target qubit, no angle.
    pub fn is_one_target(self) -> bool {
        matches!(
            self,
            Gate::H
                | Gate::X
                | Gate::Y
                | Gate::Z
                | Gate::S
                | Gate::T
                | Gate::SX
                | Gate::Sdag
                | Gate::Tdag
                | Gate::SXdag
        )
    }

    /// One target qubit plus a rotation angle.
    pub fn is_one_target_one_angle(self) -> bool {
        matches!(self, Gate::RX | Gate::RY | Gate::RZ | Gate::P)
    }

    /// One control and one target qubit, no angle.
    pub fn is_one_control_one_target(self) -> bool {
        matches!(
            self,
            Gate::CH
                | Gate::CX
                | Gate::CY
                | Gate::CZ
                | Gate::CS
                | Gate::CT
                | Gate::CSX
                | Gate::CSdag
                | Gate::CTdag
                | Gate::CSXdag
        )
    }

    /// One control and one target qubit plus a rotation angle.
    pub fn is_one_control_one_target_one_angle(self) -> bool {
        matches!(self, Gate::CRX | Gate::CRY | Gate::CRZ | Gate::CP)
    }

    /// Any transform gate acting on a single qubit, including U.
    pub fn is_single_qubit_transform(self) -> bool {
        self.is_one_target() || self.is_one_target_one_angle() || self == Gate::U
    }

    /// Any transform gate acting on a control/target pair, including CU.
    pub fn is_double_qubit_transform(self) -> bool {
        self.is_one_control_one_target()
            || self.is_one_control_one_target_one_angle()
            || self == Gate::CU
    }

    /// True for the angle-carrying kinds (controlled or not).
    pub fn is_angle_transform(self) -> bool {
        self.is_one_target_one_angle() || self.is_one_control_one_target_one_angle()
    }

    /// Maps an uncontrolled kind to its controlled counterpart.
    pub fn controlled(self) -> Option<Gate> {
        Some(match self {
            Gate::H => Gate::CH,
            Gate::X => Gate::CX,
            Gate::Y => Gate::CY,
            Gate::Z => Gate::CZ,
            Gate::S => Gate::CS,
            Gate::T => Gate::CT,
            Gate::SX => Gate::CSX,
            Gate::Sdag => Gate::CSdag,
            Gate::Tdag => Gate::CTdag,
            Gate::SXdag => Gate::CSXdag,
            Gate::RX => Gate::CRX,
            Gate::RY => Gate::CRY,
            Gate::RZ => Gate::CRZ,
            Gate::P => Gate::CP,
            Gate::U => Gate::CU,
            _ => return None,
        })
    }

    /// Maps a controlled kind back to its single-target counterpart.
    pub fn uncontrolled(self) -> Option<Gate> {
        Some(match self {
            Gate::CH => Gate::H,
            Gate::CX => Gate::X,
            Gate::CY => Gate::Y,
            Gate::CZ => Gate::Z,
            Gate::CS => Gate::S,
            Gate::CT => Gate::T,
            Gate::CSX => Gate::SX,
            Gate::CSdag => Gate::Sdag,
            Gate::CTdag => Gate::Tdag,
            Gate::CSXdag => Gate::SXdag,
            Gate::CRX => Gate::RX,
            Gate::CRY => Gate::RY,
            Gate::CRZ => Gate::RZ,
            Gate::CP => Gate::P,
            Gate::CU => Gate::U,
            _ => return None,
        })
    }

    /// The fixed 2x2 matrix of a non-angle kind, as applied to the target.
    ///
    /// Controlled kinds return the matrix of their target action. Angle
    /// kinds, U, CU, and M return `None`.
    pub fn base_matrix(self) -> Option<Matrix2x2> {
        let kind = self.uncontrolled().unwrap_or(self);
        Some(match kind {
            Gate::H => gates::H,
            Gate::X => gates::X,
            Gate::Y => gates::Y,
            Gate::Z => gates::Z,
            Gate::S => gates::S,
            Gate::T => gates::T,
            Gate::SX => gates::SX,
            Gate::Sdag => gates::SDAG,
            Gate::Tdag => gates::TDAG,
            Gate::SXdag => gates::SXDAG,
            _ => return None,
        })
    }

    /// The 2x2 matrix applied to the target qubit, resolving angle kinds.
    ///
    /// Returns `None` for U, CU, and M, whose matrices live outside the kind.
    pub fn target_matrix(self, angle: f64) -> Option<Matrix2x2> {
        if let Some(matrix) = self.base_matrix() {
            return Some(matrix);
        }

        let kind = self.uncontrolled().unwrap_or(self);
        Some(match kind {
            Gate::RX => gates::rx(angle),
            Gate::RY => gates::ry(angle),
            Gate::RZ => gates::rz(angle),
            Gate::P => gates::p(angle),
            _ => return None,
        })
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::H => "H",
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::S => "S",
            Gate::T => "T",
            Gate::SX => "SX",
            Gate::Sdag => "SDAG",
            Gate::Tdag => "TDAG",
            Gate::SXdag => "SXDAG",
            Gate::RX => "RX",
            Gate::RY => "RY",
            Gate::RZ => "RZ",
            Gate::P => "P",
            Gate::CH => "CH",
            Gate::CX => "CX",
            Gate::CY => "CY",
            Gate::CZ => "CZ",
            Gate::CS => "CS",
            Gate::CT => "CT",
            Gate::CSX => "CSX",
            Gate::CSdag => "CSDAG",
            Gate::CTdag => "CTDAG",
            Gate::CSXdag => "CSXDAG",
            Gate::CRX => "CRX",
            Gate::CRY => "CRY",
            Gate::CRZ => "CRZ",
            Gate::CP => "CP",
            Gate::U => "U",
            Gate::CU => "CU",
            Gate::M => "M",
        };
        write!(f, "{name}")
    }
}

/// Packed description of one gate element.
///
/// Field meaning per kind:
///
/// | kind family | arg0 | arg1 | angle | matrix_slot |
/// |---|---|---|---|---|
/// | one-target | target | - | - | - |
/// | one-target, one-angle | target | - | angle | - |
/// | one-control, one-target | control | target | - | - |
/// | one-control, one-target, one-angle | control | target | angle | - |
/// | U | target | - | - | slot |
/// | CU | control | target | - | slot |
/// | M | qubit | bit | - | - |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateInfo {
    pub gate: Gate,
    pub arg0: usize,
    pub arg1: usize,
    pub angle: f64,
    pub matrix_slot: usize,
    pub parameter: Option<ParameterId>,
}

impl GateInfo {
    /// Creates a one-target gate record.
    pub fn one_target(gate: Gate, target: usize) -> Self {
        debug_assert!(gate.is_one_target());
        Self {
            gate,
            arg0: target,
            arg1: 0,
            angle: 0.0,
            matrix_slot: 0,
            parameter: None,
        }
    }

    /// Creates a one-target, one-angle gate record.
    pub fn one_target_one_angle(gate: Gate, target: usize, angle: f64) -> Self {
        debug_assert!(gate.is_one_target_one_angle());
        Self {
            gate,
            arg0: target,
            arg1: 0,
            angle,
            matrix_slot: 0,
            parameter: None,
        }
    }

    /// Creates a one-control, one-target gate record.
    pub fn one_control_one_target(gate: Gate, control: usize, target: usize) -> Self {
        debug_assert!(gate.is_one_control_one_target());
        Self {
            gate,
            arg0: control,
            arg1: target,
            angle: 0.0,
            matrix_slot: 0,
            parameter: None,
        }
    }

    /// Creates a one-control, one-target, one-angle gate record.
    pub fn one_control_one_target_one_angle(
        gate: Gate,
        control: usize,
        target: usize,
        angle: f64,
    ) -> Self {
        debug_assert!(gate.is_one_control_one_target_one_angle());
        Self {
            gate,
            arg0: control,
            arg1: target,
            angle,
            matrix_slot: 0,
            parameter: None,
        }
    }

    /// Creates a U gate record referencing a matrix slot.
    pub fn u(target: usize, matrix_slot: usize) -> Self {
        Self {
            gate: Gate::U,
            arg0: target,
            arg1: 0,
            angle: 0.0,
            matrix_slot,
            parameter: None,
        }
    }

    /// Creates a CU gate record referencing a matrix slot.
    pub fn cu(control: usize, target: usize, matrix_slot: usize) -> Self {
        Self {
            gate: Gate::CU,
            arg0: control,
            arg1: target,
            angle: 0.0,
            matrix_slot,
            parameter: None,
        }
    }

    /// Creates a measurement record for `qubit` written into `bit`.
    pub fn m(qubit: usize, bit: usize) -> Self {
        Self {
            gate: Gate::M,
            arg0: qubit,
            arg1: bit,
            angle: 0.0,
            matrix_slot: 0,
            parameter: None,
        }
    }

    /// Attaches a parameter ID to an angle gate record.
    pub fn with_parameter(mut self, id: ParameterId) -> Self {
        debug_assert!(self.gate.is_angle_transform());
        self.parameter = Some(id);
        self
    }

    /// The target qubit of a single-qubit transform or measurement.
    pub fn target(&self) -> usize {
        if self.gate.is_double_qubit_transform() {
            self.arg1
        } else {
            self.arg0
        }
    }

    /// The (control, target) pair of a double-qubit transform.
    pub fn control_target(&self) -> (usize, usize) {
        (self.arg0, self.arg1)
    }

    /// The (qubit, bit) pair of a measurement.
    pub fn qubit_bit(&self) -> (usize, usize) {
        (self.arg0, self.arg1)
    }

    /// All qubit operands of this gate, for range checking.
    pub fn qubits(&self) -> Vec<usize> {
        if self.gate.is_double_qubit_transform() {
            vec![self.arg0, self.arg1]
        } else {
            vec![self.arg0]
        }
    }

    /// Structural equality of gate records at the default angle tolerance.
    ///
    /// U/CU records compare by operand indices only; the referenced matrices
    /// are owned by the circuit and compared by the caller.
    pub fn almost_eq(&self, other: &Self) -> bool {
        self.almost_eq_with_tolerance(other, GATE_ANGLE_TOLERANCE)
    }

    /// Structural equality with an explicit angle tolerance.
    pub fn almost_eq_with_tolerance(&self, other: &Self, angle_tolerance: f64) -> bool {
        if self.gate != other.gate {
            return false;
        }

        let operands_match = self.arg0 == other.arg0
            && (!self.gate.is_double_qubit_transform() && self.gate != Gate::M
                || self.arg1 == other.arg1);

        let angles_match = !self.gate.is_angle_transform()
            || (self.angle - other.angle).abs() < angle_tolerance;

        operands_match && angles_match
    }
}

impl fmt::Display for GateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gate.is_one_target() {
            write!(f, "{}({})", self.gate, self.arg0)
        } else if self.gate.is_one_target_one_angle() {
            write!(f, "{}({}, {:.4})", self.gate, self.arg0, self.angle)
        } else if self.gate.is_one_control_one_target() || self.gate == Gate::M {
            write!(f, "{}({}, {})", self.gate, self.arg0, self.arg1)
        } else if self.gate.is_one_control_one_target_one_angle() {
            write!(
                f,
                "{}({}, {}, {:.4})",
                self.gate, self.arg0, self.arg1, self.angle
            )
        } else if self.gate == Gate::U {
            write!(f, "U({}, m{})", self.arg0, self.matrix_slot)
        } else {
            write!(f, "CU({}, {}, m{})", self.arg0, self.arg1, self.matrix_slot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_disjoint() {
        let all = [
            Gate::H,
            Gate::X,
            Gate::Y,
            Gate::Z,
            Gate::S,
            Gate::T,
            Gate::SX,
            Gate::Sdag,
            Gate::Tdag,
            Gate::SXdag,
            Gate::RX,
            Gate::RY,
            Gate::RZ,
            Gate::P,
            Gate::CH,
            Gate::CX,
            Gate::CY,
            Gate::CZ,
            Gate::CS,
            Gate::CT,
            Gate::CSX,
            Gate::CSdag,
            Gate::CTdag,
            Gate::CSXdag,
            Gate::CRX,
            Gate::CRY,
            Gate::CRZ,
            Gate::CP,
            Gate::U,
            Gate::CU,
            Gate::M,
        ];

        for gate in all {
            let families = [
                gate.is_one_target(),
                gate.is_one_target_one_angle(),
                gate.is_one_control_one_target(),
                gate.is_one_control_one_target_one_angle(),
                gate == Gate::U,
                gate == Gate::CU,
                gate == Gate::M,
            ];
            assert_eq!(
                families.iter().filter(|&&in_family| in_family).count(),
                1,
                "gate {gate} must belong to exactly one family"
            );
        }
    }

    #[test]
    fn test_controlled_round_trip() {
        for gate in [
            Gate::H,
            Gate::X,
            Gate::SX,
            Gate::Sdag,
            Gate::RX,
            Gate::P,
            Gate::U,
        ] {
            let lifted = gate.controlled().unwrap();
            assert_eq!(lifted.uncontrolled(), Some(gate));
        }
        assert_eq!(Gate::M.controlled(), None);
        assert_eq!(Gate::CX.controlled(), None);
    }

    #[test]
    fn test_base_matrix_matches_constants() {
        assert!(Gate::H.base_matrix().unwrap().almost_eq(&gates::H));
        assert!(Gate::CX.base_matrix().unwrap().almost_eq(&gates::X));
        assert!(Gate::CSdag.base_matrix().unwrap().almost_eq(&gates::SDAG));
        assert!(Gate::RX.base_matrix().is_none());
        assert!(Gate::U.base_matrix().is_none());
    }

    #[test]
    fn test_target_matrix_resolves_angles() {
        let matrix = Gate::CRY.target_matrix(0.7).unwrap();
        assert!(matrix.almost_eq(&gates::ry(0.7)));
        assert!(Gate::CU.target_matrix(0.0).is_none());
    }

    #[test]
    fn test_gate_info_accessors() {
        let info = GateInfo::one_control_one_target_one_angle(Gate::CRX, 2, 5, 0.25);
        assert_eq!(info.control_target(), (2, 5));
        assert_eq!(info.target(), 5);
        assert_eq!(info.qubits(), vec![2, 5]);

        let measure = GateInfo::m(1, 3);
        assert_eq!(measure.qubit_bit(), (1, 3));
        assert_eq!(measure.qubits(), vec![1]);
    }

    #[test]
    fn test_almost_eq_angle_tolerance() {
        let a = GateInfo::one_target_one_angle(Gate::RZ, 0, 1.0);
        let b = GateInfo::one_target_one_angle(Gate::RZ, 0, 1.0 + 1.0e-8);
        let c = GateInfo::one_target_one_angle(Gate::RZ, 0, 1.1);

        assert!(a.almost_eq(&b));
        assert!(!a.almost_eq(&c));
    }

    #[test]
    fn test_almost_eq_measurement_compares_bit() {
        let a = GateInfo::m(0, 0);
        let b = GateInfo::m(0, 1);
        assert!(!a.almost_eq(&b));
    }
}
