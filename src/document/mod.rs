//! Packed document model and JSON envelope reader

mod envelope;
mod errors;
mod types;

pub use envelope::{document_from_value, parse_document, OBJECT_REF_KEY};
pub use errors::{EnvelopeError, EnvelopeResult};
pub use types::{
    AssetTable, ComponentRecord, NodeRecord, PackedDocument, PoolEntry, DEFAULT_REVISION,
};
