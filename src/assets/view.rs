//! Asset table views
//!
//! `Referenced` lists only the slots the graph uses, including slots the
//! table lacks. `Full` lists the whole table and marks which entries are
//! used.

use serde::{Deserialize, Serialize};

use crate::document::AssetTable;
use crate::graph::DecodedGraph;

use super::resolver::referenced_slots;

/// Which asset table rows to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetView {
    #[default]
    Referenced,
    Full,
}

/// One row of an asset table view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRow {
    pub slot: usize,
    /// `None` when the slot is missing from the table
    pub identifier: Option<String>,
    /// Whether any field in the graph points at this slot
    pub referenced: bool,
}

/// Builds the rows of an asset table view, in slot order
pub fn asset_rows(graph: &DecodedGraph, table: &AssetTable, view: AssetView) -> Vec<AssetRow> {
    let referenced = referenced_slots(graph);
    match view {
        AssetView::Referenced => referenced
            .iter()
            .map(|&slot| AssetRow {
                slot,
                identifier: table.get(slot).map(str::to_string),
                referenced: true,
            })
            .collect(),
        AssetView::Full => table
            .iter()
            .map(|(slot, identifier)| AssetRow {
                slot,
                identifier: Some(identifier.to_string()),
                referenced: referenced.contains(&slot),
            })
            .collect(),
    }
}
