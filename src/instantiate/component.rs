//! Typed component records

use std::fmt;
use std::sync::Arc;

use crate::assets::AssetReference;
use crate::decode::DecodeError;
use crate::pool::ResolvedValue;
use crate::registry::FieldKind;

use super::value_type::EngineValue;

/// Decoded value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A resolved value matching the expected kind (or null)
    Present(Arc<ResolvedValue>),
    /// A decoded engine value type
    Engine(EngineValue),
    /// The document carries no value for this schema field
    Absent,
    /// A resolved value that does not match the expected kind
    Mismatch(Arc<ResolvedValue>),
    /// A single asset slot
    Asset(AssetReference),
    /// A list of asset slots, null entries dropped
    AssetList(Vec<AssetReference>),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, FieldValue::Mismatch(_))
    }

    /// The resolved value, for present and mismatched fields
    pub fn resolved(&self) -> Option<&ResolvedValue> {
        match self {
            FieldValue::Present(value) | FieldValue::Mismatch(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_engine(&self) -> Option<&EngineValue> {
        match self {
            FieldValue::Engine(value) => Some(value),
            _ => None,
        }
    }

    /// Asset references held by this value
    pub fn asset_references(&self) -> &[AssetReference] {
        match self {
            FieldValue::Asset(reference) => std::slice::from_ref(reference),
            FieldValue::AssetList(references) => references,
            _ => &[],
        }
    }

    pub(crate) fn asset_references_mut(&mut self) -> &mut [AssetReference] {
        match self {
            FieldValue::Asset(reference) => std::slice::from_mut(reference),
            FieldValue::AssetList(references) => references,
            _ => &mut [],
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Present(value) => write!(f, "{}", value),
            FieldValue::Engine(value) => write!(f, "{}", value),
            FieldValue::Absent => write!(f, "<absent>"),
            FieldValue::Mismatch(value) => write!(f, "{} <mismatch>", value),
            FieldValue::Asset(reference) => write!(f, "{}", reference),
            FieldValue::AssetList(references) => {
                write!(f, "[")?;
                for (i, reference) in references.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", reference)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// One named field of a component
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Kind the schema expects
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }
}

/// A typed record: a component, or a node's own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    type_name: String,
    /// Index into the document's class types, if the type came from there
    type_index: Option<usize>,
    /// Index into the document's component records
    record: Option<usize>,
    /// Whether the registry knew the type
    known: bool,
    fields: Vec<Field>,
}

impl Component {
    pub(crate) fn new(
        type_name: impl Into<String>,
        type_index: Option<usize>,
        known: bool,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            type_index,
            record: None,
            known,
            fields,
        }
    }

    pub(crate) fn with_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_index(&self) -> Option<usize> {
        self.type_index
    }

    /// Component record index, `None` for node attributes
    pub fn record(&self) -> Option<usize> {
        self.record
    }

    /// False when the type was absent from the registry and the fields
    /// carry positional names
    pub fn is_known(&self) -> bool {
        self.known
    }

    /// Fields in declared order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Shorthand for a string-valued field
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name)?.value.resolved()?.as_str()
    }

    /// Every asset reference in field order
    pub fn asset_references(&self) -> impl Iterator<Item = &AssetReference> {
        self.fields
            .iter()
            .flat_map(|field| field.value.asset_references().iter())
    }

    pub(crate) fn asset_references_mut(&mut self) -> impl Iterator<Item = &mut AssetReference> {
        self.fields
            .iter_mut()
            .flat_map(|field| field.value.asset_references_mut().iter_mut())
    }

    pub fn mismatch_count(&self) -> usize {
        self.fields.iter().filter(|f| f.value.is_mismatch()).count()
    }

    /// Recoverable issues carried by this record: one `UnknownType` for an
    /// unregistered type and one `TypeMismatch` per mismatched field.
    pub fn issues(&self) -> Vec<DecodeError> {
        let mut issues = Vec::new();
        if !self.known {
            issues.push(DecodeError::unknown_type(&self.type_name));
        }
        for field in &self.fields {
            if let FieldValue::Mismatch(value) = &field.value {
                issues.push(DecodeError::type_mismatch(
                    &field.name,
                    field.kind.type_name(),
                    value.kind_name(),
                ));
            }
        }
        let record = self.record;
        issues
            .into_iter()
            .map(|issue| match record {
                Some(record) => issue.with_component(record),
                None => issue,
            })
            .collect()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if !self.known {
            write!(f, " (unknown)")?;
        }
        Ok(())
    }
}
