//! Text rendering for the inspect and schemas commands
//!
//! Rendering only reads a finished graph. Output is plain text, one item
//! per line, indented two spaces per tree level.

use std::fmt::Write;

use crate::assets::{AssetRow, AssetView};
use crate::graph::{DecodedGraph, Node, ResolutionReport};
use crate::instantiate::{Component, FieldValue};
use crate::registry::ClassRegistry;

/// Scene tree with components, non-empty fields and asset references
pub fn render_tree(graph: &DecodedGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Scene graph:");
    if graph.is_empty() {
        let _ = writeln!(out, "  [no nodes]");
        return out;
    }

    for (depth, node) in graph.walk() {
        let indent = "  ".repeat(depth + 1);
        let _ = writeln!(out, "{}- {}", indent, node_line(node));
        for component in node.components() {
            render_component(&mut out, &indent, component);
        }
    }

    if graph.roots().len() > 1 {
        let _ = writeln!(out, "  ({} roots)", graph.roots().len());
    }
    out
}

fn node_line(node: &Node) -> String {
    let mut line = node.to_string();
    let attributes = node.attributes();
    for (label, field) in [("anc", "_anchorPoint"), ("size", "_contentSize"), ("color", "_color")] {
        if let Some(value) = attributes.field(field).and_then(|f| f.value.as_engine()) {
            let _ = write!(line, " {}={}", label, value);
        }
    }
    line
}

fn render_component(out: &mut String, indent: &str, component: &Component) {
    let _ = writeln!(out, "{}    └─ {}", indent, component);
    for field in component.fields() {
        if !shows(&field.value) {
            continue;
        }
        let _ = writeln!(out, "{}         {} = {}", indent, field.name, field.value);
    }
}

/// Absent and null fields are left out of the tree
fn shows(value: &FieldValue) -> bool {
    match value {
        FieldValue::Absent => false,
        FieldValue::Present(resolved) => !resolved.is_null(),
        FieldValue::AssetList(references) => !references.is_empty(),
        _ => true,
    }
}

/// Asset table view
pub fn render_assets(rows: &[AssetRow], view: AssetView) -> String {
    let mut out = String::new();
    let title = match view {
        AssetView::Referenced => "File assets (referenced only):",
        AssetView::Full => "File assets (full table):",
    };
    if rows.is_empty() {
        let _ = writeln!(out, "File assets: [none]");
        return out;
    }

    let _ = writeln!(out, "{}", title);
    for row in rows {
        let marker = if row.referenced { "*" } else { " " };
        match &row.identifier {
            Some(identifier) => {
                let _ = writeln!(out, "  {} {:>5}  {}", marker, row.slot, identifier);
            }
            None => {
                let _ = writeln!(out, "  {} {:>5}  <missing>", marker, row.slot);
            }
        }
    }
    out
}

/// Report counters and issues
pub fn render_report(report: &ResolutionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Resolution report:");
    let _ = writeln!(out, "  resolved assets:   {}", report.resolved_asset_count);
    let _ = writeln!(out, "  unresolved assets: {}", report.unresolved_asset_count);
    let _ = writeln!(out, "  unknown types:     {}", report.unknown_type_count);
    let _ = writeln!(out, "  field mismatches:  {}", report.field_mismatch_count);
    for issue in &report.issues {
        let _ = writeln!(out, "  {}", issue);
    }
    out
}

/// Every class of a registry with its field layout
pub fn render_schemas(registry: &ClassRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Revision {} ({} classes):",
        registry.revision(),
        registry.len()
    );
    for schema in registry.classes() {
        let _ = writeln!(out, "  {}", schema.name);
        for (position, field) in schema.fields.iter().enumerate() {
            let _ = writeln!(out, "    {:>2}  {:<28} {}", position, field.name, field.kind.type_name());
        }
    }
    out
}
