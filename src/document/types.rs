//! Packed document model
//!
//! A `PackedDocument` is the immutable input of a decode. Every cross
//! reference is an index into one of its tables; nothing here has been
//! checked against those tables yet.

use std::collections::BTreeMap;

/// Format revision assumed when the envelope does not carry one.
pub const DEFAULT_REVISION: u32 = 1;

/// One raw entry of the shared value pool
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEntry {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Composite value: each element is another pool index
    Composite(Vec<usize>),
    /// Reference to a node record by index
    ObjectRef(usize),
}

/// Positional component encoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Index into `PackedDocument::class_types`
    pub type_index: usize,
    /// Pool indices, one per schema field in schema order
    pub fields: Vec<usize>,
}

impl ComponentRecord {
    pub fn new(type_index: usize, fields: Vec<usize>) -> Self {
        Self { type_index, fields }
    }
}

/// Flat node descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRecord {
    /// Index into `PackedDocument::class_types`; `None` means the node class
    pub type_index: Option<usize>,
    /// Declared parent node, if the record carries one
    pub parent: Option<usize>,
    /// Child node indices, in display order
    pub children: Vec<usize>,
    /// Indices into `PackedDocument::components`, in declared order
    pub components: Vec<usize>,
    /// Pool indices for the node's own attributes
    pub fields: Vec<usize>,
}

impl NodeRecord {
    /// A record with no links, components or attributes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = children;
        self
    }

    pub fn with_components(mut self, components: Vec<usize>) -> Self {
        self.components = components;
        self
    }

    pub fn with_fields(mut self, fields: Vec<usize>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_type(mut self, type_index: usize) -> Self {
        self.type_index = Some(type_index);
        self
    }
}

/// Asset slot index to stable asset identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTable {
    entries: BTreeMap<usize, String>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an identifier, returning the one it replaced
    pub fn insert(&mut self, slot: usize, identifier: impl Into<String>) -> Option<String> {
        self.entries.insert(slot, identifier.into())
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.entries.get(&slot).map(String::as_str)
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.entries.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(slot, id)| (*slot, id.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for AssetTable {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(slot, id)| (slot, id.into())).collect(),
        }
    }
}

/// The parsed envelope handed to the decoder
#[derive(Debug, Clone, PartialEq)]
pub struct PackedDocument {
    /// Bundle format revision, selects the class registry table
    pub revision: u32,
    /// Shared value pool
    pub pool: Vec<PoolEntry>,
    /// Ordered type identifiers
    pub class_types: Vec<String>,
    /// Component records referenced by node records
    pub components: Vec<ComponentRecord>,
    /// Node records in document order
    pub node_records: Vec<NodeRecord>,
    /// Asset slot table
    pub asset_table: AssetTable,
}

impl Default for PackedDocument {
    fn default() -> Self {
        Self {
            revision: DEFAULT_REVISION,
            pool: Vec::new(),
            class_types: Vec::new(),
            components: Vec::new(),
            node_records: Vec::new(),
            asset_table: AssetTable::new(),
        }
    }
}

impl PackedDocument {
    /// Creates an empty document for the default revision
    pub fn new() -> Self {
        Self::default()
    }

    /// Type identifier for a class type index
    pub fn class_type(&self, type_index: usize) -> Option<&str> {
        self.class_types.get(type_index).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.node_records.len()
    }
}
