//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use qsv_core::prelude::*;
//! ```

pub use crate::config::{IoSection, QsvConfig, SimulatorSection};
pub use crate::error::{QsvError, Result};
pub use crate::math::{
    bitstring_to_state_index, endian_flip, state_index_to_bitstring, Endian,
    COMPLEX_ALMOST_EQ_TOLERANCE, GATE_ANGLE_TOLERANCE, NORMALIZATION_TOLERANCE,
    PROBABILITY_CUTOFF,
};
pub use crate::matrix::{gates, Matrix2x2, C64};
pub use crate::types::{
    Circuit, CircuitElement, CircuitLogger, ClassicalRegister, ControlFlowPredicate, Gate,
    GateInfo, LoggerKind, Parameter, ParameterExpression, ParameterId, ParameterTable,
    Parameterized, PauliOperator, PauliPhase, PauliTerm, PredicatePolarity, SparsePauliString,
    WeightedPauliString,
};
