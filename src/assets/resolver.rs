//! Asset reference resolution
//!
//! Runs after the graph is built. Looks up every asset slot in the asset
//! table and records whether an identifier exists. A missing slot is a
//! counter, never an error.

use std::collections::BTreeSet;

use tracing::debug;

use crate::document::AssetTable;
use crate::graph::DecodedGraph;

use super::reference::AssetStatus;

/// Resolves every asset reference in `graph` against `table`.
///
/// Returns a new graph; the input is left untouched. Counters are
/// recomputed, so resolving an already resolved graph against another
/// table is consistent.
pub fn resolve_assets(graph: &DecodedGraph, table: &AssetTable) -> DecodedGraph {
    let mut resolved = graph.clone();
    let mut hits = 0;
    let mut misses = 0;

    for node in resolved.nodes_mut() {
        for record in node.records_mut() {
            for reference in record.asset_references_mut() {
                match table.get(reference.slot) {
                    Some(identifier) => {
                        reference.identifier = Some(identifier.to_string());
                        reference.status = AssetStatus::Resolved;
                        hits += 1;
                    }
                    None => {
                        reference.identifier = None;
                        reference.status = AssetStatus::Unresolved;
                        misses += 1;
                    }
                }
            }
        }
    }

    debug!(resolved = hits, unresolved = misses, table_size = table.len(), "assets resolved");

    let report = resolved.report_mut();
    report.resolved_asset_count = hits;
    report.unresolved_asset_count = misses;
    resolved
}

/// Asset slots referenced anywhere in the graph, ascending
pub fn referenced_slots(graph: &DecodedGraph) -> BTreeSet<usize> {
    graph
        .nodes()
        .iter()
        .flat_map(|node| node.records())
        .flat_map(|record| record.asset_references())
        .map(|reference| reference.slot)
        .collect()
}
