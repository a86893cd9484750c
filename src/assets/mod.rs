//! Asset reference resolution
//!
//! Asset-typed fields carry slot indices. This module maps slots to stable
//! identifiers through the document's asset table. Asset contents are
//! never loaded.

mod reference;
mod resolver;
mod view;

pub use reference::{AssetReference, AssetStatus};
pub use resolver::{referenced_slots, resolve_assets};
pub use view::{asset_rows, AssetRow, AssetView};
