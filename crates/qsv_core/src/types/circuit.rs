//! Circuit container and construction API.
//!
//! A [`Circuit`] is an ordered sequence of [`CircuitElement`]s plus the
//! resources those elements reference: a table of 2x2 matrices for U/CU
//! gates and a [`ParameterTable`] for parameterized rotations. Nested
//! subcircuits inside classical-control elements are owned by their element;
//! cloning a circuit deep-copies every owned subcircuit.

use serde::{Deserialize, Serialize};

use crate::error::{QsvError, Result};
use crate::matrix::Matrix2x2;
use crate::types::gate::{Gate, GateInfo};
use crate::types::parameter::{ParameterId, ParameterTable, Parameterized};
use crate::types::predicate::ControlFlowPredicate;

/// What a logger element reports when tooling walks the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggerKind {
    /// Dump the amplitudes at this point.
    Statevector,
    /// Dump the probability vector at this point.
    Probabilities,
}

/// An observational no-op element.
///
/// Loggers are ignored by the simulation kernel and by structural
/// comparison; tooling may act on them when walking the element stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLogger {
    pub kind: LoggerKind,
}

/// One entry in a circuit's element sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CircuitElement {
    /// A primitive, U/CU, or measurement gate.
    Gate(GateInfo),
    /// Execute the subcircuit when the predicate holds.
    IfStatement(ControlFlowPredicate, Box<Circuit>),
    /// Execute exactly one of the two subcircuits per the predicate.
    IfElseStatement(ControlFlowPredicate, Box<Circuit>, Box<Circuit>),
    /// Observational no-op.
    Logger(CircuitLogger),
}

impl CircuitElement {
    pub fn is_gate(&self) -> bool {
        matches!(self, CircuitElement::Gate(_))
    }

    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            CircuitElement::IfStatement(..) | CircuitElement::IfElseStatement(..)
        )
    }

    pub fn is_logger(&self) -> bool {
        matches!(self, CircuitElement::Logger(_))
    }

    pub fn as_gate(&self) -> Option<&GateInfo> {
        match self {
            CircuitElement::Gate(info) => Some(info),
            _ => None,
        }
    }
}

/// An ordered program of gates, measurements, and classical control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    n_qubits: usize,
    n_bits: usize,
    elements: Vec<CircuitElement>,
    matrices: Vec<Matrix2x2>,
    parameters: ParameterTable,
}

macro_rules! one_target_builders {
    ($(($gate:ident, $single:ident, $bulk:ident)),* $(,)?) => {
        $(
            /// Appends the gate to the given target qubit.
            pub fn $single(&mut self, target: usize) -> Result<()> {
                self.add_one_target_gate(Gate::$gate, target)
            }

            /// Appends one gate per target qubit, in argument order.
            pub fn $bulk(&mut self, targets: impl IntoIterator<Item = usize>) -> Result<()> {
                for target in targets {
                    self.add_one_target_gate(Gate::$gate, target)?;
                }
                Ok(())
            }
        )*
    };
}

macro_rules! one_target_one_angle_builders {
    ($(($gate:ident, $single:ident, $bulk:ident, $param:ident, $with_param:ident)),* $(,)?) => {
        $(
            /// Appends the rotation to the given target qubit.
            pub fn $single(&mut self, target: usize, angle: f64) -> Result<()> {
                self.add_one_target_one_angle_gate(Gate::$gate, target, angle)
            }

            /// Appends one rotation per `(target, angle)` pair.
            pub fn $bulk(
                &mut self,
                targets_and_angles: impl IntoIterator<Item = (usize, f64)>,
            ) -> Result<()> {
                for (target, angle) in targets_and_angles {
                    self.add_one_target_one_angle_gate(Gate::$gate, target, angle)?;
                }
                Ok(())
            }

            /// Appends a freshly parameterized rotation, returning its ID.
            pub fn $param(
                &mut self,
                target: usize,
                initial_angle: f64,
                _tag: Parameterized,
            ) -> Result<ParameterId> {
                self.add_parameterized_one_target_one_angle_gate(
                    Gate::$gate,
                    target,
                    initial_angle,
                )
            }

            /// Appends a rotation bound to an existing parameter.
            pub fn $with_param(&mut self, target: usize, id: ParameterId) -> Result<()> {
                self.add_one_target_one_angle_gate_with_parameter(Gate::$gate, target, id)
            }
        )*
    };
}

macro_rules! one_control_one_target_builders {
    ($(($gate:ident, $single:ident, $bulk:ident)),* $(,)?) => {
        $(
            /// Appends the controlled gate to the `(control, target)` pair.
            pub fn $single(&mut self, control: usize, target: usize) -> Result<()> {
                self.add_one_control_one_target_gate(Gate::$gate, control, target)
            }

            /// Appends one gate per `(control, target)` pair.
            pub fn $bulk(
                &mut self,
                control_target_pairs: impl IntoIterator<Item = (usize, usize)>,
            ) -> Result<()> {
                for (control, target) in control_target_pairs {
                    self.add_one_control_one_target_gate(Gate::$gate, control, target)?;
                }
                Ok(())
            }
        )*
    };
}

macro_rules! one_control_one_target_one_angle_builders {
    ($(($gate:ident, $single:ident, $bulk:ident, $param:ident, $with_param:ident)),* $(,)?) => {
        $(
            /// Appends the controlled rotation to the `(control, target)` pair.
            pub fn $single(&mut self, control: usize, target: usize, angle: f64) -> Result<()> {
                self.add_one_control_one_target_one_angle_gate(Gate::$gate, control, target, angle)
            }

            /// Appends one controlled rotation per `(control, target, angle)` triple.
            pub fn $bulk(
                &mut self,
                triples: impl IntoIterator<Item = (usize, usize, f64)>,
            ) -> Result<()> {
                for (control, target, angle) in triples {
                    self.add_one_control_one_target_one_angle_gate(
                        Gate::$gate,
                        control,
                        target,
                        angle,
                    )?;
                }
                Ok(())
            }

            /// Appends a freshly parameterized controlled rotation, returning its ID.
            pub fn $param(
                &mut self,
                control: usize,
                target: usize,
                initial_angle: f64,
                _tag: Parameterized,
            ) -> Result<ParameterId> {
                self.add_parameterized_one_control_one_target_one_angle_gate(
                    Gate::$gate,
                    control,
                    target,
                    initial_angle,
                )
            }

            /// Appends a controlled rotation bound to an existing parameter.
            pub fn $with_param(
                &mut self,
                control: usize,
                target: usize,
                id: ParameterId,
            ) -> Result<()> {
                self.add_one_control_one_target_one_angle_gate_with_parameter(
                    Gate::$gate,
                    control,
                    target,
                    id,
                )
            }
        )*
    };
}

impl Circuit {
    /// Creates an empty circuit with `n_bits = n_qubits`.
    pub fn new(n_qubits: usize) -> Self {
        Self::with_bits(n_qubits, n_qubits)
    }

    /// Creates an empty circuit with an explicit classical register width.
    pub fn with_bits(n_qubits: usize, n_bits: usize) -> Self {
        assert!(n_qubits >= 1, "a circuit needs at least one qubit");
        Self {
            n_qubits,
            n_bits,
            elements: Vec::new(),
            matrices: Vec::new(),
            parameters: ParameterTable::new(),
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    pub fn elements(&self) -> &[CircuitElement] {
        &self.elements
    }

    pub fn matrices(&self) -> &[Matrix2x2] {
        &self.matrices
    }

    /// The matrix referenced by a U/CU element's slot.
    pub fn matrix_at(&self, slot: usize) -> Option<&Matrix2x2> {
        self.matrices.get(slot)
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    /// Number of elements, without recursing into subcircuits.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of gate elements, recursing into subcircuits.
    pub fn gate_count(&self) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                CircuitElement::Gate(_) => 1,
                CircuitElement::IfStatement(_, sub) => sub.gate_count(),
                CircuitElement::IfElseStatement(_, sub_if, sub_else) => {
                    sub_if.gate_count() + sub_else.gate_count()
                }
                CircuitElement::Logger(_) => 0,
            })
            .sum()
    }

    /// Critical-path length over plain gate elements.
    ///
    /// Control-flow elements act as barriers across every qubit.
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.n_qubits];

        for element in &self.elements {
            match element {
                CircuitElement::Gate(info) => {
                    let qubits = info.qubits();
                    let level = qubits
                        .iter()
                        .map(|&q| qubit_depths[q])
                        .max()
                        .unwrap_or(0);
                    for &q in &qubits {
                        qubit_depths[q] = level + 1;
                    }
                }
                CircuitElement::IfStatement(..) | CircuitElement::IfElseStatement(..) => {
                    let level = qubit_depths.iter().copied().max().unwrap_or(0);
                    for depth in &mut qubit_depths {
                        *depth = level + 1;
                    }
                }
                CircuitElement::Logger(_) => {}
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // generic builders
    // ------------------------------------------------------------------

    /// Appends a one-target gate of the given kind.
    pub fn add_one_target_gate(&mut self, gate: Gate, target: usize) -> Result<()> {
        if !gate.is_one_target() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-target gate"
            )));
        }
        self.check_qubit_(target)?;
        self.elements
            .push(CircuitElement::Gate(GateInfo::one_target(gate, target)));
        Ok(())
    }

    /// Appends a one-target rotation of the given kind.
    pub fn add_one_target_one_angle_gate(
        &mut self,
        gate: Gate,
        target: usize,
        angle: f64,
    ) -> Result<()> {
        if !gate.is_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-target, one-angle gate"
            )));
        }
        self.check_qubit_(target)?;
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_target_one_angle(gate, target, angle),
        ));
        Ok(())
    }

    /// Appends a freshly parameterized one-target rotation.
    pub fn add_parameterized_one_target_one_angle_gate(
        &mut self,
        gate: Gate,
        target: usize,
        initial_angle: f64,
    ) -> Result<ParameterId> {
        if !gate.is_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-target, one-angle gate"
            )));
        }
        self.check_qubit_(target)?;
        let id = self.parameters.insert_fresh(initial_angle);
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_target_one_angle(gate, target, initial_angle).with_parameter(id),
        ));
        Ok(id)
    }

    /// Appends a one-target rotation bound to an existing parameter.
    pub fn add_one_target_one_angle_gate_with_parameter(
        &mut self,
        gate: Gate,
        target: usize,
        id: ParameterId,
    ) -> Result<()> {
        if !gate.is_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-target, one-angle gate"
            )));
        }
        self.check_qubit_(target)?;
        self.parameters.bind_existing(id)?;
        let angle = self.parameters.value_of(id)?;
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_target_one_angle(gate, target, angle).with_parameter(id),
        ));
        Ok(())
    }

    /// Appends a controlled gate of the given kind.
    pub fn add_one_control_one_target_gate(
        &mut self,
        gate: Gate,
        control: usize,
        target: usize,
    ) -> Result<()> {
        if !gate.is_one_control_one_target() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-control, one-target gate"
            )));
        }
        self.check_control_target_(control, target)?;
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_control_one_target(gate, control, target),
        ));
        Ok(())
    }

    /// Appends a controlled rotation of the given kind.
    pub fn add_one_control_one_target_one_angle_gate(
        &mut self,
        gate: Gate,
        control: usize,
        target: usize,
        angle: f64,
    ) -> Result<()> {
        if !gate.is_one_control_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-control, one-target, one-angle gate"
            )));
        }
        self.check_control_target_(control, target)?;
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_control_one_target_one_angle(gate, control, target, angle),
        ));
        Ok(())
    }

    /// Appends a freshly parameterized controlled rotation.
    pub fn add_parameterized_one_control_one_target_one_angle_gate(
        &mut self,
        gate: Gate,
        control: usize,
        target: usize,
        initial_angle: f64,
    ) -> Result<ParameterId> {
        if !gate.is_one_control_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-control, one-target, one-angle gate"
            )));
        }
        self.check_control_target_(control, target)?;
        let id = self.parameters.insert_fresh(initial_angle);
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_control_one_target_one_angle(gate, control, target, initial_angle)
                .with_parameter(id),
        ));
        Ok(id)
    }

    /// Appends a controlled rotation bound to an existing parameter.
    pub fn add_one_control_one_target_one_angle_gate_with_parameter(
        &mut self,
        gate: Gate,
        control: usize,
        target: usize,
        id: ParameterId,
    ) -> Result<()> {
        if !gate.is_one_control_one_target_one_angle() {
            return Err(QsvError::construction(format!(
                "{gate} is not a one-control, one-target, one-angle gate"
            )));
        }
        self.check_control_target_(control, target)?;
        self.parameters.bind_existing(id)?;
        let angle = self.parameters.value_of(id)?;
        self.elements.push(CircuitElement::Gate(
            GateInfo::one_control_one_target_one_angle(gate, control, target, angle)
                .with_parameter(id),
        ));
        Ok(())
    }

    // ------------------------------------------------------------------
    // named builders
    // ------------------------------------------------------------------

    one_target_builders!(
        (H, add_h_gate, add_h_gates),
        (X, add_x_gate, add_x_gates),
        (Y, add_y_gate, add_y_gates),
        (Z, add_z_gate, add_z_gates),
        (S, add_s_gate, add_s_gates),
        (T, add_t_gate, add_t_gates),
        (SX, add_sx_gate, add_sx_gates),
        (Sdag, add_sdag_gate, add_sdag_gates),
        (Tdag, add_tdag_gate, add_tdag_gates),
        (SXdag, add_sxdag_gate, add_sxdag_gates),
    );

    one_target_one_angle_builders!(
        (
            RX,
            add_rx_gate,
            add_rx_gates,
            add_parameterized_rx_gate,
            add_rx_gate_with_parameter
        ),
        (
            RY,
            add_ry_gate,
            add_ry_gates,
            add_parameterized_ry_gate,
            add_ry_gate_with_parameter
        ),
        (
            RZ,
            add_rz_gate,
            add_rz_gates,
            add_parameterized_rz_gate,
            add_rz_gate_with_parameter
        ),
        (
            P,
            add_p_gate,
            add_p_gates,
            add_parameterized_p_gate,
            add_p_gate_with_parameter
        ),
    );

    one_control_one_target_builders!(
        (CH, add_ch_gate, add_ch_gates),
        (CX, add_cx_gate, add_cx_gates),
        (CY, add_cy_gate, add_cy_gates),
        (CZ, add_cz_gate, add_cz_gates),
        (CS, add_cs_gate, add_cs_gates),
        (CT, add_ct_gate, add_ct_gates),
        (CSX, add_csx_gate, add_csx_gates),
        (CSdag, add_csdag_gate, add_csdag_gates),
        (CTdag, add_ctdag_gate, add_ctdag_gates),
        (CSXdag, add_csxdag_gate, add_csxdag_gates),
    );

    one_control_one_target_one_angle_builders!(
        (
            CRX,
            add_crx_gate,
            add_crx_gates,
            add_parameterized_crx_gate,
            add_crx_gate_with_parameter
        ),
        (
            CRY,
            add_cry_gate,
            add_cry_gates,
            add_parameterized_cry_gate,
            add_cry_gate_with_parameter
        ),
        (
            CRZ,
            add_crz_gate,
            add_crz_gates,
            add_parameterized_crz_gate,
            add_crz_gate_with_parameter
        ),
        (
            CP,
            add_cp_gate,
            add_cp_gates,
            add_parameterized_cp_gate,
            add_cp_gate_with_parameter
        ),
    );

    /// Appends a U gate, storing its matrix in the circuit's matrix table.
    pub fn add_u_gate(&mut self, matrix: Matrix2x2, target: usize) -> Result<()> {
        self.check_qubit_(target)?;
        let slot = self.push_matrix(matrix);
        self.elements
            .push(CircuitElement::Gate(GateInfo::u(target, slot)));
        Ok(())
    }

    /// Appends a CU gate, storing its matrix in the circuit's matrix table.
    pub fn add_cu_gate(&mut self, matrix: Matrix2x2, control: usize, target: usize) -> Result<()> {
        self.check_control_target_(control, target)?;
        let slot = self.push_matrix(matrix);
        self.elements
            .push(CircuitElement::Gate(GateInfo::cu(control, target, slot)));
        Ok(())
    }

    /// Appends a measurement of `qubit` into classical bit `qubit`.
    pub fn add_m_gate(&mut self, qubit: usize) -> Result<()> {
        self.add_m_gate_to_bit(qubit, qubit)
    }

    /// Appends a measurement of `qubit` into an explicit classical bit.
    pub fn add_m_gate_to_bit(&mut self, qubit: usize, bit: usize) -> Result<()> {
        self.check_qubit_(qubit)?;
        self.check_bit_(bit)?;
        self.elements
            .push(CircuitElement::Gate(GateInfo::m(qubit, bit)));
        Ok(())
    }

    /// Appends one measurement per qubit, each into the same-numbered bit.
    pub fn add_m_gates(&mut self, qubits: impl IntoIterator<Item = usize>) -> Result<()> {
        for qubit in qubits {
            self.add_m_gate(qubit)?;
        }
        Ok(())
    }

    /// Appends a classically controlled subcircuit.
    pub fn add_if_statement(
        &mut self,
        predicate: ControlFlowPredicate,
        subcircuit: Circuit,
    ) -> Result<()> {
        self.check_subcircuit_(&subcircuit)?;
        self.check_bit_(predicate.max_bit_index())?;
        self.elements.push(CircuitElement::IfStatement(
            predicate,
            Box::new(subcircuit),
        ));
        Ok(())
    }

    /// Appends a classically controlled if/else pair of subcircuits.
    pub fn add_if_else_statement(
        &mut self,
        predicate: ControlFlowPredicate,
        if_subcircuit: Circuit,
        else_subcircuit: Circuit,
    ) -> Result<()> {
        self.check_subcircuit_(&if_subcircuit)?;
        self.check_subcircuit_(&else_subcircuit)?;
        self.check_bit_(predicate.max_bit_index())?;
        self.elements.push(CircuitElement::IfElseStatement(
            predicate,
            Box::new(if_subcircuit),
            Box::new(else_subcircuit),
        ));
        Ok(())
    }

    /// Appends an observational logger element.
    pub fn add_circuit_logger(&mut self, kind: LoggerKind) {
        self.elements
            .push(CircuitElement::Logger(CircuitLogger { kind }));
    }

    // ------------------------------------------------------------------
    // parameters
    // ------------------------------------------------------------------

    /// Updates the value bound to a parameter ID.
    pub fn set_parameter_value(&mut self, id: ParameterId, value: f64) -> Result<()> {
        self.parameters.set_value(id, value)
    }

    /// Reads the value bound to a parameter ID.
    pub fn parameter_value(&self, id: ParameterId) -> Result<f64> {
        self.parameters.value_of(id)
    }

    /// Copies every parameter entry of `other` into this circuit's table.
    ///
    /// Shared IDs take the value from `other`.
    pub fn merge_parameters_from(&mut self, other: &Circuit) {
        self.parameters.merge_from(&other.parameters);
    }

    // ------------------------------------------------------------------
    // raw element access for rewrite passes
    // ------------------------------------------------------------------

    /// Stores a matrix in the table, returning its slot index.
    pub fn push_matrix(&mut self, matrix: Matrix2x2) -> usize {
        self.matrices.push(matrix);
        self.matrices.len() - 1
    }

    /// Appends a pre-built gate record, re-validating its operands.
    ///
    /// U/CU records must reference an existing matrix slot; parameterized
    /// records must reference an existing table entry.
    pub fn add_gate_info(&mut self, info: GateInfo) -> Result<()> {
        for qubit in info.qubits() {
            self.check_qubit_(qubit)?;
        }
        if info.gate.is_double_qubit_transform() && info.arg0 == info.arg1 {
            return Err(QsvError::construction(
                "control and target qubits must differ",
            ));
        }
        if info.gate == Gate::M {
            self.check_bit_(info.arg1)?;
        }
        if matches!(info.gate, Gate::U | Gate::CU) && info.matrix_slot >= self.matrices.len() {
            return Err(QsvError::construction(format!(
                "matrix slot {} is not in the table",
                info.matrix_slot
            )));
        }
        if let Some(id) = info.parameter {
            if !self.parameters.contains(id) {
                return Err(QsvError::UnknownParameterId(id.to_string()));
            }
        }
        self.elements.push(CircuitElement::Gate(info));
        Ok(())
    }

    // ------------------------------------------------------------------
    // validation
    // ------------------------------------------------------------------

    fn check_qubit_(&self, index: usize) -> Result<()> {
        if index >= self.n_qubits {
            return Err(QsvError::InvalidQubitIndex {
                index,
                n_qubits: self.n_qubits,
            });
        }
        Ok(())
    }

    fn check_bit_(&self, index: usize) -> Result<()> {
        if index >= self.n_bits {
            return Err(QsvError::InvalidBitIndex {
                index,
                n_bits: self.n_bits,
            });
        }
        Ok(())
    }

    fn check_control_target_(&self, control: usize, target: usize) -> Result<()> {
        self.check_qubit_(control)?;
        self.check_qubit_(target)?;
        if control == target {
            return Err(QsvError::construction(
                "control and target qubits must differ",
            ));
        }
        Ok(())
    }

    fn check_subcircuit_(&self, subcircuit: &Circuit) -> Result<()> {
        if subcircuit.n_qubits != self.n_qubits {
            return Err(QsvError::SizeMismatch {
                expected: self.n_qubits,
                found: subcircuit.n_qubits,
            });
        }
        if subcircuit.n_bits != self.n_bits {
            return Err(QsvError::SizeMismatch {
                expected: self.n_bits,
                found: subcircuit.n_bits,
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a CircuitElement;
    type IntoIter = std::slice::Iter<'a, CircuitElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl std::fmt::Display for Circuit {
    /// Renders one element per line, indenting nested subcircuits.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn write_circuit(
            f: &mut std::fmt::Formatter<'_>,
            circuit: &Circuit,
            indent: usize,
        ) -> std::fmt::Result {
            let pad = "  ".repeat(indent);
            for element in &circuit.elements {
                match element {
                    CircuitElement::Gate(info) => writeln!(f, "{pad}{info}")?,
                    CircuitElement::IfStatement(predicate, subcircuit) => {
                        writeln!(f, "{pad}IF {:?} {:?} {{", predicate.bit_indices(), predicate.expected())?;
                        write_circuit(f, subcircuit, indent + 1)?;
                        writeln!(f, "{pad}}}")?;
                    }
                    CircuitElement::IfElseStatement(predicate, if_sub, else_sub) => {
                        writeln!(f, "{pad}IF {:?} {:?} {{", predicate.bit_indices(), predicate.expected())?;
                        write_circuit(f, if_sub, indent + 1)?;
                        writeln!(f, "{pad}}} ELSE {{")?;
                        write_circuit(f, else_sub, indent + 1)?;
                        writeln!(f, "{pad}}}")?;
                    }
                    CircuitElement::Logger(logger) => {
                        writeln!(f, "{pad}LOG {:?}", logger.kind)?
                    }
                }
            }
            Ok(())
        }

        writeln!(f, "circuit[{} qubits, {} bits]", self.n_qubits, self.n_bits)?;
        write_circuit(f, self, 1)
    }
}
