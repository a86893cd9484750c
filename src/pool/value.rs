//! Resolved pool values

use std::fmt;
use std::sync::Arc;

/// A fully materialized pool entry.
///
/// Array elements are shared `Arc`s: an entry referenced from several
/// composites is one allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Arc<ResolvedValue>>),
    /// Reference to a node by its record index
    ObjectRef(usize),
}

impl ResolvedValue {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResolvedValue::Null => "null",
            ResolvedValue::Bool(_) => "bool",
            ResolvedValue::Number(_) => "number",
            ResolvedValue::String(_) => "string",
            ResolvedValue::Array(_) => "array",
            ResolvedValue::ObjectRef(_) => "object_ref",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResolvedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResolvedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Arc<ResolvedValue>]> {
        match self {
            ResolvedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// A number usable as a table slot: finite, integral, non-negative
    pub fn as_index(&self) -> Option<usize> {
        match self {
            ResolvedValue::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
                if *n <= usize::MAX as f64 {
                    Some(*n as usize)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Null => write!(f, "null"),
            ResolvedValue::Bool(b) => write!(f, "{}", b),
            ResolvedValue::Number(n) => write!(f, "{}", n),
            ResolvedValue::String(s) => write!(f, "{:?}", s),
            ResolvedValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ResolvedValue::ObjectRef(node) => write!(f, "&node{}", node),
        }
    }
}
