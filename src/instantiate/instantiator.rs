//! Object instantiator
//!
//! Zips a class schema with a positional array of pool indices. Field `i`
//! of the packed record is schema field `i`; nothing else ties a value to
//! its name.

use std::sync::Arc;

use tracing::debug;

use crate::assets::AssetReference;
use crate::decode::{DecodeError, DecodeResult, IndexTable};
use crate::document::PackedDocument;
use crate::pool::{PoolResolver, ResolvedValue};
use crate::registry::{ClassRegistry, FieldKind};

use super::component::{Component, Field, FieldValue};
use super::value_type::decode_engine_value;

/// Name given to a field that has no schema entry
pub fn positional_name(position: usize) -> String {
    format!("prop_{}", position)
}

/// Builds typed records for one decode.
///
/// Owns the pool resolver, so every record instantiated through the same
/// instantiator shares one memo table.
pub struct Instantiator<'a> {
    document: &'a PackedDocument,
    registry: &'a ClassRegistry,
    resolver: PoolResolver<'a>,
}

impl<'a> Instantiator<'a> {
    pub fn new(document: &'a PackedDocument, registry: &'a ClassRegistry) -> Self {
        Self {
            document,
            registry,
            resolver: PoolResolver::new(&document.pool, document.node_count()),
        }
    }

    /// Instantiates a record whose type is a class type index.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` for a bad type index or field index, and
    /// `CyclicReference` from the pool. An unregistered type is not an
    /// error here; the record comes back with `is_known() == false`.
    pub fn instantiate(&mut self, type_index: usize, field_indices: &[usize]) -> DecodeResult<Component> {
        let type_name = self.document.class_type(type_index).ok_or_else(|| {
            DecodeError::index_out_of_range(
                IndexTable::ClassTypes,
                type_index,
                self.document.class_types.len(),
            )
        })?;
        self.build(type_name, Some(type_index), field_indices)
    }

    /// Instantiates a record of a named class, such as the node class for
    /// node records that carry no type.
    pub fn instantiate_named(&mut self, type_name: &str, field_indices: &[usize]) -> DecodeResult<Component> {
        self.build(type_name, None, field_indices)
    }

    fn build(
        &mut self,
        type_name: &str,
        type_index: Option<usize>,
        field_indices: &[usize],
    ) -> DecodeResult<Component> {
        let registry = self.registry;
        let schema = match registry.schema_for(type_name) {
            Ok(schema) => schema,
            Err(_) => {
                debug!(type_name, fields = field_indices.len(), "unknown type, positional fields");
                let mut fields = Vec::with_capacity(field_indices.len());
                for (position, &index) in field_indices.iter().enumerate() {
                    let value = self.resolver.resolve(index)?;
                    fields.push(Field::new(
                        positional_name(position),
                        FieldKind::Any,
                        FieldValue::Present(value),
                    ));
                }
                return Ok(Component::new(type_name, type_index, false, fields));
            }
        };

        let mut fields = Vec::with_capacity(schema.len().max(field_indices.len()));
        for (position, def) in schema.fields.iter().enumerate() {
            let value = match field_indices.get(position) {
                Some(&index) => {
                    let resolved = self.resolver.resolve(index)?;
                    typed_value(def.kind, resolved)
                }
                None => FieldValue::Absent,
            };
            fields.push(Field::new(def.name.clone(), def.kind, value));
        }

        if field_indices.len() > schema.len() {
            debug!(
                type_name,
                schema_fields = schema.len(),
                packed_fields = field_indices.len(),
                "record has more fields than its schema"
            );
            for (position, &index) in field_indices.iter().enumerate().skip(schema.len()) {
                let value = self.resolver.resolve(index)?;
                fields.push(Field::new(
                    positional_name(position),
                    FieldKind::Any,
                    FieldValue::Present(value),
                ));
            }
        }

        Ok(Component::new(type_name, type_index, true, fields))
    }

    /// The resolver backing this instantiator
    pub fn resolver(&self) -> &PoolResolver<'a> {
        &self.resolver
    }
}

/// Tags a resolved value with the kind its schema field expects
fn typed_value(kind: FieldKind, value: Arc<ResolvedValue>) -> FieldValue {
    if value.is_null() {
        return FieldValue::Present(value);
    }

    if kind.is_value_type() {
        return match decode_engine_value(kind, &value) {
            Some(decoded) => FieldValue::Engine(decoded),
            None => FieldValue::Mismatch(value),
        };
    }

    if !kind.accepts(&value) {
        return FieldValue::Mismatch(value);
    }

    match kind {
        FieldKind::Asset => match value.as_index() {
            Some(slot) => FieldValue::Asset(AssetReference::pending(slot)),
            None => FieldValue::Mismatch(value),
        },
        FieldKind::AssetList => {
            let references = value
                .as_array()
                .unwrap_or_default()
                .iter()
                .filter_map(|item| item.as_index())
                .map(AssetReference::pending)
                .collect();
            FieldValue::AssetList(references)
        }
        _ => FieldValue::Present(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComponentRecord, PoolEntry};
    use crate::instantiate::EngineValue;

    fn document() -> PackedDocument {
        PackedDocument {
            pool: vec![
                PoolEntry::String("Play".into()),           // 0
                PoolEntry::Number(24.0),                    // 1
                PoolEntry::Number(3.0),                     // 2
                PoolEntry::Null,                            // 3
                PoolEntry::Bool(true),                      // 4
                PoolEntry::Number(0.0),                     // 5
                PoolEntry::Number(100.0),                   // 6
                PoolEntry::Number(50.0),                    // 7
                PoolEntry::Composite(vec![5, 6, 7]),        // 8: vec2 (100, 50)
                PoolEntry::Composite(vec![2, 5, 3]),        // 9: asset list [3, 0, null]
            ],
            class_types: vec!["cc.Label".into(), "game.Custom".into(), "cc.Node".into()],
            components: vec![ComponentRecord::new(0, vec![])],
            ..PackedDocument::default()
        }
    }

    #[test]
    fn test_fields_follow_schema_order() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let label = inst.instantiate(0, &[2, 2, 0, 1]).unwrap();

        assert!(label.is_known());
        let names: Vec<&str> = label.fields().iter().take(4).map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["_N$verticalAlign", "_N$horizontalAlign", "_string", "_fontSize"]
        );
        assert_eq!(label.string_field("_string"), Some("Play"));
    }

    #[test]
    fn test_missing_trailing_fields_are_absent() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let label = inst.instantiate(0, &[2]).unwrap();

        let schema_len = registry.schema_for("cc.Label").unwrap().len();
        assert_eq!(label.fields().len(), schema_len);
        assert!(label.fields()[1..].iter().all(|f| f.value.is_absent()));
        assert_eq!(label.mismatch_count(), 0);
    }

    #[test]
    fn test_kind_mismatch_is_marked() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        // _string gets a number
        let label = inst.instantiate(0, &[2, 2, 1]).unwrap();
        assert!(label.field("_string").unwrap().value.is_mismatch());
        assert_eq!(label.mismatch_count(), 1);
    }

    #[test]
    fn test_null_accepted_for_typed_field() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let label = inst.instantiate(0, &[3, 3, 3]).unwrap();
        assert_eq!(label.mismatch_count(), 0);
        assert!(label.field("_string").unwrap().value.resolved().unwrap().is_null());
    }

    #[test]
    fn test_unknown_type_uses_positional_names() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let custom = inst.instantiate(1, &[0, 4]).unwrap();

        assert!(!custom.is_known());
        assert_eq!(custom.type_name(), "game.Custom");
        let names: Vec<&str> = custom.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["prop_0", "prop_1"]);
        assert!(custom.fields().iter().all(|f| f.kind == FieldKind::Any));
    }

    #[test]
    fn test_extra_fields_kept_positionally() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let schema_len = registry.schema_for("cc.Camera").unwrap().len();

        let mut indices = vec![2; schema_len];
        indices[2] = 3;
        indices.push(4);
        let camera = inst.instantiate_named("cc.Camera", &indices).unwrap();

        let last = camera.fields().last().unwrap();
        assert_eq!(last.name, positional_name(schema_len));
        assert_eq!(last.kind, FieldKind::Any);
        assert_eq!(camera.mismatch_count(), 0);
    }

    #[test]
    fn test_engine_and_asset_fields() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        // cc.Node: _anchorPoint is field 11
        let mut indices = vec![3; 11];
        indices.push(8);
        let node = inst.instantiate(2, &indices).unwrap();
        assert_eq!(
            node.field("_anchorPoint").unwrap().value.as_engine(),
            Some(&EngineValue::Vec2 { x: 100.0, y: 50.0 })
        );

        // cc.Label: _materials is field 11, _N$file is field 12
        let mut indices = vec![3; 11];
        indices.push(9);
        indices.push(2);
        let label = inst.instantiate(0, &indices).unwrap();
        let slots: Vec<usize> = label.asset_references().map(|r| r.slot).collect();
        assert_eq!(slots, vec![3, 0, 3]);
    }

    #[test]
    fn test_engine_value_with_wrong_tag_is_mismatch() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        // cc.Node: _color is field 12, given a vec2 array
        let mut indices = vec![3; 12];
        indices.push(8);
        let node = inst.instantiate(2, &indices).unwrap();
        assert!(node.field("_color").unwrap().value.is_mismatch());
    }

    #[test]
    fn test_bad_type_index() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        let err = inst.instantiate(9, &[]).unwrap_err();
        assert_eq!(err.code(), crate::decode::DecodeErrorCode::IndexOutOfRange);
    }

    #[test]
    fn test_bad_field_index_aborts() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        assert!(inst.instantiate(0, &[99]).unwrap_err().is_fatal());
    }

    #[test]
    fn test_shared_memo_across_records() {
        let doc = document();
        let registry = ClassRegistry::builtin();
        let mut inst = Instantiator::new(&doc, &registry);
        inst.instantiate(0, &[2, 2, 0]).unwrap();
        let before = inst.resolver().resolved_count();
        inst.instantiate(0, &[2, 2, 0]).unwrap();
        assert_eq!(inst.resolver().resolved_count(), before);
    }
}
