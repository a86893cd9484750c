//! Built-in self-test
//!
//! Decodes fixed sample fragments through the instantiator, the registry
//! and the full decoder, and checks the results. Each case is independent;
//! a failing case does not stop the others.

use serde_json::json;

use crate::assets::{resolve_assets, AssetStatus};
use crate::decode::{decode, DecodeErrorCode};
use crate::document::{document_from_value, PackedDocument};
use crate::graph::{GraphBuilder, NodeId};
use crate::instantiate::{Component, FieldValue, Instantiator};
use crate::observability::{log_event, Event};
use crate::registry::{ClassRegistry, ClassSchema, FieldDef, FieldKind, RegistryError};

/// Outcome of one self-test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: &'static str,
    /// `None` when the case passed
    pub failure: Option<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

type Case = fn(&ClassRegistry) -> Result<(), String>;

const CASES: &[(&str, Case)] = &[
    ("cc.Label fragment", label_fragment),
    ("cc.Sprite fragment", sprite_fragment),
    ("unknown component fallback", unknown_fragment),
    ("registry immutability", registry_immutability),
    ("scene graph linking", scene_linking),
];

/// Runs every case against `registry`
pub fn run_selftest(registry: &ClassRegistry) -> Vec<CaseResult> {
    CASES
        .iter()
        .map(|&(name, case)| {
            let failure = case(registry).err();
            match &failure {
                None => log_event!(Event::SelftestPassed, case = name),
                Some(reason) => {
                    log_event!(Event::SelftestFailed, case = name, reason = reason.as_str())
                }
            }
            CaseResult { name, failure }
        })
        .collect()
}

fn check(condition: bool, message: impl FnOnce() -> String) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message())
    }
}

fn fragment(value: serde_json::Value) -> Result<PackedDocument, String> {
    document_from_value(value).map_err(|e| e.to_string())
}

fn single_component(doc: &PackedDocument, registry: &ClassRegistry) -> Result<Component, String> {
    let record = doc
        .components
        .first()
        .ok_or_else(|| "fragment has no component".to_string())?;
    Instantiator::new(doc, registry)
        .instantiate(record.type_index, &record.fields)
        .map_err(|e| e.to_string())
}

fn label_fragment(registry: &ClassRegistry) -> Result<(), String> {
    let doc = fragment(json!({
        "pool": [1, 0, "Hello World", 24, true, 36, null, [], 101],
        "classTypes": ["cc.Label"],
        "components": [{"type": 0, "fields": [0, 1, 2, 3, 4, 1, 5, 1, 1, 4, 6, 7, 8]}]
    }))?;
    let label = single_component(&doc, registry)?;

    check(label.is_known(), || "cc.Label not in registry".into())?;
    check(label.string_field("_string") == Some("Hello World"), || {
        format!("_string decoded as {:?}", label.string_field("_string"))
    })?;
    let font_size = label
        .field("_fontSize")
        .and_then(|f| f.value.resolved())
        .and_then(|v| v.as_f64());
    check(font_size == Some(24.0), || format!("_fontSize decoded as {:?}", font_size))?;
    let slots: Vec<usize> = label.asset_references().map(|r| r.slot).collect();
    check(slots == [101], || format!("asset slots {:?}", slots))?;
    check(label.mismatch_count() == 0, || "unexpected mismatches".into())
}

fn sprite_fragment(registry: &ClassRegistry) -> Result<(), String> {
    let doc = fragment(json!({
        "pool": [0, 1, true, 770, 1.0, null, [], 100],
        "classTypes": ["cc.Sprite"],
        "components": [{"type": 0, "fields": [0, 1, 2, 2, 3, 4, 5, 6, 7]}],
        "nodeRecords": [{"components": [0]}],
        "assetTable": {"100": "button_bg.png"}
    }))?;
    let graph = GraphBuilder::new(&doc, registry)
        .build()
        .map_err(|e| e.to_string())?;
    let graph = resolve_assets(&graph, &doc.asset_table);

    let sprite = graph
        .components(NodeId::new(0))
        .first()
        .ok_or_else(|| "sprite not attached".to_string())?;
    let frame = sprite
        .field("_spriteFrame")
        .ok_or_else(|| "_spriteFrame missing".to_string())?;
    match &frame.value {
        FieldValue::Asset(reference) => {
            check(reference.status == AssetStatus::Resolved, || {
                format!("sprite frame {}", reference)
            })?;
            check(reference.identifier.as_deref() == Some("button_bg.png"), || {
                format!("sprite frame {}", reference)
            })
        }
        other => Err(format!("_spriteFrame decoded as {}", other)),
    }
}

fn unknown_fragment(registry: &ClassRegistry) -> Result<(), String> {
    let doc = fragment(json!({
        "pool": ["some_value", 42, 4, 255, 128, 64, [2, 3, 4, 5, 3], true],
        "classTypes": ["cc.UnknownComponent"],
        "components": [{"type": 0, "fields": [0, 1, 6, 7]}]
    }))?;
    let component = single_component(&doc, registry)?;

    check(!component.is_known(), || "type unexpectedly known".into())?;
    let names: Vec<&str> = component.fields().iter().map(|f| f.name.as_str()).collect();
    check(names == ["prop_0", "prop_1", "prop_2", "prop_3"], || {
        format!("positional names {:?}", names)
    })?;
    let issues = component.issues();
    check(
        issues.len() == 1 && issues[0].code() == DecodeErrorCode::UnknownType,
        || format!("issues {:?}", issues),
    )
}

fn registry_immutability(registry: &ClassRegistry) -> Result<(), String> {
    let mut extended = registry.clone();
    let custom = ClassSchema::new("cc.Custom", vec![FieldDef::new("custom", FieldKind::String)]);
    extended.register(custom).map_err(|e| e.to_string())?;
    check(extended.contains("cc.Custom"), || "cc.Custom not registered".into())?;

    let replacement = ClassSchema::new("cc.Label", vec![]);
    match extended.register(replacement) {
        Err(RegistryError::Immutable { .. }) => Ok(()),
        Err(other) => Err(format!("unexpected error {}", other)),
        Ok(()) => Err("cc.Label layout was replaced".into()),
    }
}

fn scene_linking(registry: &ClassRegistry) -> Result<(), String> {
    let doc = fragment(json!({
        "pool": ["Main", "Canvas", "Button", "Label"],
        "classTypes": ["cc.Scene"],
        "nodeRecords": [
            {"type": 0, "fields": [0], "children": [1]},
            {"fields": [1], "children": [2]},
            {"fields": [2]},
            {"fields": [3], "parent": 2}
        ]
    }))?;
    let graph = decode(&doc, registry).map_err(|e| e.to_string())?;

    check(graph.roots() == [NodeId::new(0)], || format!("roots {:?}", graph.roots()))?;
    check(
        graph.children(NodeId::new(2)) == [NodeId::new(3)],
        || "declared parent not linked".into(),
    )?;
    check(graph.report().is_clean(), || format!("{:?}", graph.report()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cases_pass_on_builtin_registry() {
        let results = run_selftest(&ClassRegistry::builtin());
        assert_eq!(results.len(), CASES.len());
        for result in &results {
            assert!(result.passed(), "{} failed: {:?}", result.name, result.failure);
        }
    }

    #[test]
    fn test_cases_fail_on_empty_registry() {
        let results = run_selftest(&ClassRegistry::new(1));
        assert!(results.iter().any(|r| !r.passed()));
    }
}
