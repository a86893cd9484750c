//! JSON envelope reader
//!
//! Envelope shape:
//!
//! ```json
//! {
//!   "revision": 1,
//!   "pool": [1, "hero", [0, 1], {"$ref": 0}, null],
//!   "classTypes": ["cc.Label"],
//!   "components": [{"type": 0, "fields": [1, 0]}],
//!   "nodeRecords": [{"children": [], "components": [0], "fields": [1]}],
//!   "assetTable": {"0": "uuid-123"}
//! }
//! ```
//!
//! Only the envelope shape is checked here. Cross references are left to
//! the decoder, which reports them as structural errors.

use serde::Deserialize;
use serde_json::Value;

use super::errors::{EnvelopeError, EnvelopeResult};
use super::types::{
    AssetTable, ComponentRecord, NodeRecord, PackedDocument, PoolEntry, DEFAULT_REVISION,
};

/// Key marking an object reference inside the pool.
pub const OBJECT_REF_KEY: &str = "$ref";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default = "default_revision")]
    revision: u32,
    #[serde(default)]
    pool: Vec<Value>,
    #[serde(default)]
    class_types: Vec<String>,
    #[serde(default)]
    components: Vec<RawComponent>,
    #[serde(default)]
    node_records: Vec<RawNode>,
    #[serde(default)]
    asset_table: Value,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    #[serde(rename = "type")]
    type_index: usize,
    #[serde(default)]
    fields: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    type_index: Option<usize>,
    #[serde(default)]
    parent: Option<usize>,
    #[serde(default)]
    children: Vec<usize>,
    #[serde(default)]
    components: Vec<usize>,
    #[serde(default)]
    fields: Vec<usize>,
}

fn default_revision() -> u32 {
    DEFAULT_REVISION
}

/// Parses envelope JSON text into a packed document.
pub fn parse_document(text: &str) -> EnvelopeResult<PackedDocument> {
    let value: Value = serde_json::from_str(text)?;
    document_from_value(value)
}

/// Converts an already parsed JSON value into a packed document.
pub fn document_from_value(value: Value) -> EnvelopeResult<PackedDocument> {
    let raw: RawDocument = serde_json::from_value(value)?;

    let pool = raw
        .pool
        .iter()
        .enumerate()
        .map(|(index, entry)| pool_entry(index, entry))
        .collect::<EnvelopeResult<Vec<_>>>()?;

    let components = raw
        .components
        .into_iter()
        .map(|c| ComponentRecord::new(c.type_index, c.fields))
        .collect();

    let node_records = raw
        .node_records
        .into_iter()
        .map(|n| NodeRecord {
            type_index: n.type_index,
            parent: n.parent,
            children: n.children,
            components: n.components,
            fields: n.fields,
        })
        .collect();

    Ok(PackedDocument {
        revision: raw.revision,
        pool,
        class_types: raw.class_types,
        components,
        node_records,
        asset_table: asset_table(&raw.asset_table)?,
    })
}

fn pool_entry(index: usize, value: &Value) -> EnvelopeResult<PoolEntry> {
    match value {
        Value::Null => Ok(PoolEntry::Null),
        Value::Bool(b) => Ok(PoolEntry::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(PoolEntry::Number)
            .ok_or_else(|| EnvelopeError::pool_entry(index, "number is not representable")),
        Value::String(s) => Ok(PoolEntry::String(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                as_index(item).ok_or_else(|| {
                    EnvelopeError::pool_entry(
                        index,
                        format!("composite element {} is not a pool index", item),
                    )
                })
            })
            .collect::<EnvelopeResult<Vec<_>>>()
            .map(PoolEntry::Composite),
        Value::Object(map) => {
            if map.len() != 1 {
                return Err(EnvelopeError::pool_entry(
                    index,
                    format!("object entries must be {{\"{}\": <node>}}", OBJECT_REF_KEY),
                ));
            }
            map.get(OBJECT_REF_KEY)
                .and_then(as_index)
                .map(PoolEntry::ObjectRef)
                .ok_or_else(|| {
                    EnvelopeError::pool_entry(index, "object reference must name a node index")
                })
        }
    }
}

fn asset_table(value: &Value) -> EnvelopeResult<AssetTable> {
    let mut table = AssetTable::new();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, id) in map {
                let slot: usize = key.parse().map_err(|_| {
                    EnvelopeError::InvalidAssetTable(format!("slot '{}' is not an index", key))
                })?;
                let id = id.as_str().ok_or_else(|| {
                    EnvelopeError::InvalidAssetTable(format!("slot {} is not a string", slot))
                })?;
                table.insert(slot, id);
            }
        }
        Value::Array(items) => {
            for (slot, id) in items.iter().enumerate() {
                match id {
                    Value::Null => {}
                    Value::String(s) => {
                        table.insert(slot, s.as_str());
                    }
                    other => {
                        return Err(EnvelopeError::InvalidAssetTable(format!(
                            "slot {} holds {}, expected a string",
                            slot, other
                        )))
                    }
                }
            }
        }
        other => {
            return Err(EnvelopeError::InvalidAssetTable(format!(
                "expected object or array, got {}",
                other
            )))
        }
    }
    Ok(table)
}

fn as_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|n| usize::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pool_entries_map_to_variants() {
        let doc = document_from_value(json!({
            "pool": [null, true, 2.5, "hero", [0, 1], {"$ref": 0}],
        }))
        .unwrap();

        assert_eq!(
            doc.pool,
            vec![
                PoolEntry::Null,
                PoolEntry::Bool(true),
                PoolEntry::Number(2.5),
                PoolEntry::String("hero".into()),
                PoolEntry::Composite(vec![0, 1]),
                PoolEntry::ObjectRef(0),
            ]
        );
    }

    #[test]
    fn test_missing_sections_default() {
        let doc = parse_document("{}").unwrap();
        assert_eq!(doc.revision, DEFAULT_REVISION);
        assert!(doc.pool.is_empty());
        assert!(doc.node_records.is_empty());
        assert!(doc.asset_table.is_empty());
    }

    #[test]
    fn test_composite_rejects_negative_index() {
        let err = document_from_value(json!({"pool": [1, [0, -1]]})).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidPoolEntry { index: 1, .. }));
    }

    #[test]
    fn test_composite_rejects_fractional_index() {
        let err = document_from_value(json!({"pool": [[0.5]]})).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidPoolEntry { index: 0, .. }));
    }

    #[test]
    fn test_unknown_object_shape_rejected() {
        let err = document_from_value(json!({"pool": [{"x": 1}]})).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidPoolEntry { .. }));
    }

    #[test]
    fn test_asset_table_object_form() {
        let doc = document_from_value(json!({"assetTable": {"0": "uuid-123", "4": "uuid-9"}})).unwrap();
        assert_eq!(doc.asset_table.get(0), Some("uuid-123"));
        assert_eq!(doc.asset_table.get(4), Some("uuid-9"));
        assert_eq!(doc.asset_table.len(), 2);
    }

    #[test]
    fn test_asset_table_array_form_skips_nulls() {
        let doc = document_from_value(json!({"assetTable": ["a", null, "c"]})).unwrap();
        assert_eq!(doc.asset_table.get(0), Some("a"));
        assert!(doc.asset_table.get(1).is_none());
        assert_eq!(doc.asset_table.get(2), Some("c"));
    }

    #[test]
    fn test_asset_table_bad_slot_key() {
        let err = document_from_value(json!({"assetTable": {"first": "a"}})).unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidAssetTable(_)));
    }

    #[test]
    fn test_node_records_keep_links() {
        let doc = document_from_value(json!({
            "classTypes": ["cc.Scene"],
            "nodeRecords": [
                {"type": 0, "children": [1]},
                {"parent": 0, "components": [0], "fields": [2, 3]}
            ]
        }))
        .unwrap();

        assert_eq!(doc.node_records[0].type_index, Some(0));
        assert_eq!(doc.node_records[0].children, vec![1]);
        assert_eq!(doc.node_records[1].parent, Some(0));
        assert_eq!(doc.node_records[1].components, vec![0]);
        assert_eq!(doc.node_records[1].fields, vec![2, 3]);
    }

    #[test]
    fn test_malformed_json_is_envelope_error() {
        let err = parse_document("[1, 2").unwrap_err();
        assert!(matches!(err, EnvelopeError::Json(_)));
    }
}
