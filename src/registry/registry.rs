//! Versioned class registry
//!
//! The registry is fixed per bundle format revision and ships with the
//! decoder. It is never derived from the document being decoded: the packed
//! form omits field names, so they can only come from here.

use std::collections::BTreeMap;

use crate::decode::{DecodeError, DecodeResult};

use super::builtin;
use super::errors::{RegistryError, RegistryResult};
use super::types::{ClassSchema, FieldDef};

/// Class schemas for one format revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRegistry {
    revision: u32,
    /// Schemas keyed by type identifier
    classes: BTreeMap<String, ClassSchema>,
}

impl ClassRegistry {
    /// Creates an empty registry for a revision
    pub fn new(revision: u32) -> Self {
        Self {
            revision,
            classes: BTreeMap::new(),
        }
    }

    /// The built-in table for the default revision
    pub fn builtin() -> Self {
        // The default revision always ships a table.
        Self::for_revision(builtin::BUILTIN_REVISION).unwrap_or_else(|_| Self::new(0))
    }

    /// The built-in table for `revision`
    pub fn for_revision(revision: u32) -> RegistryResult<Self> {
        let table = builtin::table_for(revision).ok_or(RegistryError::UnknownRevision(revision))?;
        let mut registry = Self::new(revision);
        for (name, fields) in table {
            let fields = fields
                .iter()
                .map(|(field, kind)| FieldDef::new(*field, *kind))
                .collect();
            registry.register(ClassSchema::new(*name, fields))?;
        }
        Ok(registry)
    }

    /// Registers a class schema.
    ///
    /// # Errors
    ///
    /// - `Malformed` if the schema structure is invalid
    /// - `Immutable` if the class is already registered
    pub fn register(&mut self, schema: ClassSchema) -> RegistryResult<()> {
        schema
            .validate_structure()
            .map_err(|reason| RegistryError::malformed("<in-memory>", reason))?;

        if self.classes.contains_key(&schema.name) {
            return Err(RegistryError::Immutable {
                revision: self.revision,
                class: schema.name,
            });
        }

        self.classes.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Field schema for a type identifier.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` when the class is not registered. Whether that
    /// aborts a decode is the caller's decision.
    pub fn schema_for(&self, type_name: &str) -> DecodeResult<&ClassSchema> {
        self.classes
            .get(type_name)
            .ok_or_else(|| DecodeError::unknown_type(type_name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.classes.contains_key(type_name)
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// All schemas in type identifier order
    pub fn classes(&self) -> impl Iterator<Item = &ClassSchema> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
