//! Decode error types
//!
//! Error codes:
//! - PACK_INDEX_OUT_OF_RANGE (FATAL)
//! - PACK_CYCLIC_REFERENCE (FATAL)
//! - PACK_GRAPH_CYCLE (FATAL)
//! - PACK_MULTIPLE_PARENTS (FATAL)
//! - PACK_UNKNOWN_TYPE (RECOVERABLE)
//! - PACK_TYPE_MISMATCH (RECOVERABLE)
//!
//! Fatal errors abort the decode. Recoverable errors are collected in the
//! resolution report and decoding continues.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Severity levels for decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recorded in the report, decode continues
    Recoverable,
    /// The packed form is malformed, decode aborts
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "RECOVERABLE"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Decode error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorCode {
    /// An index does not address an entry of its pool or table
    IndexOutOfRange,
    /// A pool entry transitively contains itself
    CyclicReference,
    /// Composite pool entries nest deeper than the decoder allows
    NestingTooDeep,
    /// The parent/child linkage revisits a node
    GraphCycle,
    /// A node (or component) is claimed by two owners
    MultipleParents,
    /// A type identifier is absent from the class registry
    UnknownType,
    /// A resolved value does not match the schema's expected kind
    TypeMismatch,
}

impl DecodeErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DecodeErrorCode::IndexOutOfRange => "PACK_INDEX_OUT_OF_RANGE",
            DecodeErrorCode::CyclicReference => "PACK_CYCLIC_REFERENCE",
            DecodeErrorCode::NestingTooDeep => "PACK_NESTING_TOO_DEEP",
            DecodeErrorCode::GraphCycle => "PACK_GRAPH_CYCLE",
            DecodeErrorCode::MultipleParents => "PACK_MULTIPLE_PARENTS",
            DecodeErrorCode::UnknownType => "PACK_UNKNOWN_TYPE",
            DecodeErrorCode::TypeMismatch => "PACK_TYPE_MISMATCH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            DecodeErrorCode::UnknownType | DecodeErrorCode::TypeMismatch => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for DecodeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The table an out-of-range index pointed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTable {
    /// Shared value pool
    Pool,
    /// Class type identifiers
    ClassTypes,
    /// Component records
    Components,
    /// Node records
    Nodes,
}

impl IndexTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexTable::Pool => "pool",
            IndexTable::ClassTypes => "class type",
            IndexTable::Components => "component",
            IndexTable::Nodes => "node",
        }
    }
}

/// Decode error with location context
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    /// Error code
    code: DecodeErrorCode,
    /// Human-readable message
    message: String,
    /// Owning node record, if known
    node: Option<usize>,
    /// Component record, if known
    component: Option<usize>,
    /// Field name, if the error concerns a single field
    field: Option<String>,
}

impl DecodeError {
    fn new(code: DecodeErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            node: None,
            component: None,
            field: None,
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(table: IndexTable, index: usize, len: usize) -> Self {
        Self::new(
            DecodeErrorCode::IndexOutOfRange,
            format!(
                "{} index {} out of range (table has {} entries)",
                table.as_str(),
                index,
                len
            ),
        )
    }

    /// Create an excessive pool nesting error
    pub fn nesting_too_deep(index: usize, limit: usize) -> Self {
        Self::new(
            DecodeErrorCode::NestingTooDeep,
            format!("pool entry {} nests composites more than {} levels deep", index, limit),
        )
    }

    /// Create a cyclic pool reference error
    pub fn cyclic_reference(index: usize) -> Self {
        Self::new(
            DecodeErrorCode::CyclicReference,
            format!("pool entry {} references itself before it is resolved", index),
        )
    }

    /// Create a graph cycle error
    pub fn graph_cycle(node: usize) -> Self {
        Self::new(
            DecodeErrorCode::GraphCycle,
            format!("node {} is visited more than once while linking children", node),
        )
    }

    /// Create a multiple parents error
    pub fn multiple_parents(child: usize, first: usize, second: usize) -> Self {
        Self::new(
            DecodeErrorCode::MultipleParents,
            format!(
                "node {} is claimed as a child by both node {} and node {}",
                child, first, second
            ),
        )
    }

    /// Create an error for a component record attached to two nodes
    pub fn shared_component(component: usize, first: usize, second: usize) -> Self {
        let mut err = Self::new(
            DecodeErrorCode::MultipleParents,
            format!(
                "component {} is attached to both node {} and node {}",
                component, first, second
            ),
        );
        err.component = Some(component);
        err
    }

    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::new(
            DecodeErrorCode::UnknownType,
            format!("type '{}' is not in the class registry", type_name.into()),
        )
    }

    /// Create a type mismatch error for one field
    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        let field = field.into();
        Self {
            code: DecodeErrorCode::TypeMismatch,
            message: format!("field '{}': expected {}, got {}", field, expected, actual),
            node: None,
            component: None,
            field: Some(field),
        }
    }

    /// Attach the owning node record
    pub fn with_node(mut self, node: usize) -> Self {
        self.node.get_or_insert(node);
        self
    }

    /// Attach the component record
    pub fn with_component(mut self, component: usize) -> Self {
        self.component.get_or_insert(component);
        self
    }

    /// Returns the error code
    pub fn code(&self) -> DecodeErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the node record index if applicable
    pub fn node(&self) -> Option<usize> {
        self.node
    }

    /// Returns the component record index if applicable
    pub fn component(&self) -> Option<usize> {
        self.component
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this error aborts the decode
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(node) = self.node {
            write!(f, " (node {})", node)?;
        }
        if let Some(component) = self.component {
            write!(f, " (component {})", component)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}

impl Serialize for DecodeError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DecodeError", 5)?;
        state.serialize_field("code", self.code.code())?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("node", &self.node)?;
        state.serialize_field("component", &self.component)?;
        state.serialize_field("field", &self.field)?;
        state.end()
    }
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;
