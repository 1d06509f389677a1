//! Gate parameters and parameter expressions.
//!
//! A parameterized gate element does not store its angle inline; it stores a
//! [`ParameterId`] referring into the owning circuit's [`ParameterTable`].
//! The table holds a plain scalar per ID together with a reference count, so
//! updating a parameter between two simulations takes effect on the next run
//! without rebuilding the circuit.

use std::collections::BTreeMap;
use std::fmt;

use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{QsvError, Result};

/// Number of bytes in a parameter identifier.
pub const PARAMETER_ID_SIZE: usize = 16;

/// A stable 16-byte identifier for a circuit parameter.
///
/// IDs are drawn uniformly at random; two freshly created parameters collide
/// with negligible probability. Equality of parameterized gates is by ID,
/// never by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParameterId([u8; PARAMETER_ID_SIZE]);

impl ParameterId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self::from_rng(&mut rng)
    }

    /// Generates an identifier from a seeded generator, for reproducible tests.
    pub fn random_seeded(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    fn from_rng(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; PARAMETER_ID_SIZE];
        rng.fill(&mut bytes);
        Self(bytes)
    }

    /// Returns the raw bytes of the identifier.
    pub fn as_bytes(&self) -> &[u8; PARAMETER_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    id: ParameterId,
}

impl Parameter {
    /// Creates a parameter with a fresh random identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: ParameterId::random(),
        }
    }

    /// Creates a parameter with an existing identifier.
    pub fn with_id(name: impl Into<String>, id: ParameterId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> ParameterId {
        self.id
    }
}

/// Tag type selecting the parameterized overload of an angle-gate builder.
///
/// Passing `Parameterized` allocates a fresh parameter for the gate and the
/// builder returns its ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parameterized;

/// A bound parameter: current value plus how many gate elements reference it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub value: f64,
    pub ref_count: u32,
}

/// Per-circuit table of parameter bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    entries: BTreeMap<ParameterId, ParameterEntry>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh parameter bound to `initial_value`, returning its ID.
    pub fn insert_fresh(&mut self, initial_value: f64) -> ParameterId {
        let id = ParameterId::random();
        self.entries.insert(
            id,
            ParameterEntry {
                value: initial_value,
                ref_count: 1,
            },
        );
        id
    }

    /// Registers one more gate referencing an existing parameter.
    pub fn bind_existing(&mut self, id: ParameterId) -> Result<()> {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.ref_count += 1;
                Ok(())
            }
            None => Err(QsvError::UnknownParameterId(id.to_string())),
        }
    }

    /// Updates the value bound to `id`.
    pub fn set_value(&mut self, id: ParameterId, value: f64) -> Result<()> {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.value = value;
                Ok(())
            }
            None => Err(QsvError::UnknownParameterId(id.to_string())),
        }
    }

    /// Reads the value bound to `id`.
    pub fn value_of(&self, id: ParameterId) -> Result<f64> {
        self.entries
            .get(&id)
            .map(|entry| entry.value)
            .ok_or_else(|| QsvError::UnknownParameterId(id.to_string()))
    }

    pub fn contains(&self, id: ParameterId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterId, &ParameterEntry)> {
        self.entries.iter()
    }

    /// Merges another table into this one.
    ///
    /// Shared IDs keep a single entry whose value comes from `other` (the
    /// right-hand circuit of an append wins) and whose reference count is the
    /// sum of both sides.
    pub fn merge_from(&mut self, other: &ParameterTable) {
        for (&id, &entry) in &other.entries {
            self.entries
                .entry(id)
                .and_modify(|existing| {
                    existing.value = entry.value;
                    existing.ref_count += entry.ref_count;
                })
                .or_insert(entry);
        }
    }
}

/// Binary operations available in parameter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperation {
    Add,
    Mul,
}

/// A composable parameter expression.
///
/// Expressions are used by ansatz builders and binding surfaces that need
/// arithmetic over parameters; the simulator itself only ever sees resolved
/// scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Literal(f64),
    ParamRef(ParameterId),
    Binary {
        operation: BinaryOperation,
        left: Box<ParameterExpression>,
        right: Box<ParameterExpression>,
    },
}

impl ParameterExpression {
    /// Builds the sum of two expressions.
    pub fn add(left: ParameterExpression, right: ParameterExpression) -> Self {
        Self::Binary {
            operation: BinaryOperation::Add,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds the product of two expressions.
    pub fn mul(left: ParameterExpression, right: ParameterExpression) -> Self {
        Self::Binary {
            operation: BinaryOperation::Mul,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluates the expression against a parameter table.
    pub fn evaluate(&self, table: &ParameterTable) -> Result<f64> {
        match self {
            Self::Literal(value) => Ok(*value),
            Self::ParamRef(id) => table.value_of(*id),
            Self::Binary {
                operation,
                left,
                right,
            } => {
                let lhs = left.evaluate(table)?;
                let rhs = right.evaluate(table)?;
                Ok(match operation {
                    BinaryOperation::Add => lhs + rhs,
                    BinaryOperation::Mul => lhs * rhs,
                })
            }
        }
    }
}
