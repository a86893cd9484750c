//! Field schema definitions
//!
//! Supported kinds:
//! - any, bool, number, string, array, object_ref
//! - asset: a single asset slot index
//! - asset_list: an array of asset slot indices
//! - engine value types: vec2, vec3, vec4, quat, color, size, rect, mat4

use serde::{Deserialize, Serialize};

use crate::pool::ResolvedValue;

/// Expected kind of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Accepts any resolved value
    Any,
    Bool,
    Number,
    String,
    Array,
    /// Reference to another node
    ObjectRef,
    /// Asset slot index
    Asset,
    /// Array of asset slot indices
    AssetList,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Color,
    Size,
    Rect,
    Mat4,
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::Bool => "bool",
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::Array => "array",
            FieldKind::ObjectRef => "object_ref",
            FieldKind::Asset => "asset",
            FieldKind::AssetList => "asset_list",
            FieldKind::Vec2 => "vec2",
            FieldKind::Vec3 => "vec3",
            FieldKind::Vec4 => "vec4",
            FieldKind::Quat => "quat",
            FieldKind::Color => "color",
            FieldKind::Size => "size",
            FieldKind::Rect => "rect",
            FieldKind::Mat4 => "mat4",
        }
    }

    /// Leading tag of the packed `[tag, ...components]` array for engine
    /// value kinds
    pub fn value_type_tag(&self) -> Option<u8> {
        match self {
            FieldKind::Vec2 => Some(0),
            FieldKind::Vec3 => Some(1),
            FieldKind::Vec4 => Some(2),
            FieldKind::Quat => Some(3),
            FieldKind::Color => Some(4),
            FieldKind::Size => Some(5),
            FieldKind::Rect => Some(6),
            FieldKind::Mat4 => Some(7),
            _ => None,
        }
    }

    pub fn is_value_type(&self) -> bool {
        self.value_type_tag().is_some()
    }

    pub fn is_asset(&self) -> bool {
        matches!(self, FieldKind::Asset | FieldKind::AssetList)
    }

    /// Checks a resolved value against this kind.
    ///
    /// Null is accepted for every kind: the packed form writes null for
    /// unset fields. Engine value kinds are checked by the value type
    /// decoder, not here.
    pub fn accepts(&self, value: &ResolvedValue) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            FieldKind::Any => true,
            FieldKind::Bool => matches!(value, ResolvedValue::Bool(_)),
            FieldKind::Number => matches!(value, ResolvedValue::Number(_)),
            FieldKind::String => matches!(value, ResolvedValue::String(_)),
            FieldKind::Array => matches!(value, ResolvedValue::Array(_)),
            FieldKind::ObjectRef => matches!(value, ResolvedValue::ObjectRef(_)),
            FieldKind::Asset => value.as_index().is_some(),
            FieldKind::AssetList => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| item.is_null() || item.as_index().is_some())
            }),
            _ => matches!(value, ResolvedValue::Array(_)),
        }
    }
}

/// One positional field of a class schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Expected kind
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered field layout for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchema {
    /// Type identifier, e.g. `cc.Label`
    pub name: String,
    /// Fields in packed order
    pub fields: Vec<FieldDef>,
}

impl ClassSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Field definition at a packed position
    pub fn field_at(&self, position: usize) -> Option<&FieldDef> {
        self.fields.get(position)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates the schema structure itself
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("class name must not be empty".into());
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(format!("field {} of '{}' has an empty name", i, self.name));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!(
                    "field '{}' declared twice in '{}'",
                    field.name, self.name
                ));
            }
        }
        Ok(())
    }
}
