//! Schema loader for class tables stored on disk
//!
//! Table files live at `<schema_dir>/*.json`, one file per revision or per
//! group of classes:
//!
//! ```json
//! { "revision": 2,
//!   "classes": [ { "name": "game.Hero",
//!                  "fields": [ { "name": "hp", "kind": "number" } ] } ] }
//! ```
//!
//! Built-in tables are always present. Files may add classes to a built-in
//! revision or introduce a new revision, but never replace a class.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::builtin::BUILTIN_REVISION;
use super::errors::{RegistryError, RegistryResult};
use super::registry::ClassRegistry;
use super::types::ClassSchema;

#[derive(Debug, Deserialize)]
struct TableFile {
    revision: u32,
    #[serde(default)]
    classes: Vec<ClassSchema>,
}

/// Holds one class registry per format revision.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    /// Directory containing table files, if any
    schema_dir: Option<PathBuf>,
    /// Registries indexed by revision
    registries: BTreeMap<u32, ClassRegistry>,
}

impl SchemaLoader {
    /// Creates a loader seeded with the built-in tables.
    pub fn builtin() -> Self {
        let mut registries = BTreeMap::new();
        registries.insert(BUILTIN_REVISION, ClassRegistry::builtin());
        Self {
            schema_dir: None,
            registries,
        }
    }

    /// Creates a loader that will also read table files from `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: Some(schema_dir.to_path_buf()),
            ..Self::builtin()
        }
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Loads every table file from the schema directory.
    ///
    /// Files are read in name order so that load results are deterministic.
    /// A missing directory is an error; an empty one is not.
    pub fn load_all(&mut self) -> RegistryResult<usize> {
        let dir = match &self.schema_dir {
            Some(dir) => dir.clone(),
            None => return Ok(0),
        };

        let entries = fs::read_dir(&dir).map_err(|e| {
            RegistryError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RegistryError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            loaded += self.load_table_file(path)?;
        }
        Ok(loaded)
    }

    /// Loads one table file, returning the number of classes it added.
    ///
    /// A file is applied whole or not at all: if any class fails to
    /// register, the revision's registry is left as it was.
    pub fn load_table_file(&mut self, path: &Path) -> RegistryResult<usize> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| RegistryError::malformed(&source, format!("Failed to read file: {}", e)))?;

        let table: TableFile = serde_json::from_str(&content)
            .map_err(|e| RegistryError::malformed(&source, format!("Invalid JSON: {}", e)))?;

        let count = table.classes.len();
        let mut staged = match self.registries.get(&table.revision) {
            Some(registry) => registry.clone(),
            None => ClassRegistry::new(table.revision),
        };

        for schema in table.classes {
            staged.register(schema).map_err(|e| match e {
                RegistryError::Malformed { reason, .. } => RegistryError::malformed(&source, reason),
                other => other,
            })?;
        }
        self.registries.insert(table.revision, staged);
        Ok(count)
    }

    /// Registry for a revision.
    pub fn registry(&self, revision: u32) -> RegistryResult<&ClassRegistry> {
        self.registries
            .get(&revision)
            .ok_or(RegistryError::UnknownRevision(revision))
    }

    /// Known revisions in ascending order
    pub fn revisions(&self) -> impl Iterator<Item = u32> + '_ {
        self.registries.keys().copied()
    }
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::FieldKind;
    use tempfile::TempDir;

    fn write_table(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_builtin_revision_available() {
        let loader = SchemaLoader::builtin();
        let registry = loader.registry(BUILTIN_REVISION).unwrap();
        assert!(registry.contains("cc.Label"));
        assert_eq!(loader.revisions().collect::<Vec<_>>(), vec![BUILTIN_REVISION]);
    }

    #[test]
    fn test_load_new_revision() {
        let temp_dir = TempDir::new().unwrap();
        write_table(
            temp_dir.path(),
            "r2.json",
            r#"{"revision": 2, "classes": [
                {"name": "game.Hero", "fields": [
                    {"name": "hp", "kind": "number"},
                    {"name": "portrait", "kind": "asset"}
                ]}
            ]}"#,
        );

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 1);

        let registry = loader.registry(2).unwrap();
        let hero = registry.schema_for("game.Hero").unwrap();
        assert_eq!(hero.fields[1].kind, FieldKind::Asset);
        assert!(!registry.contains("cc.Label"));
    }

    #[test]
    fn test_extend_builtin_revision() {
        let temp_dir = TempDir::new().unwrap();
        write_table(
            temp_dir.path(),
            "extra.json",
            r#"{"revision": 1, "classes": [{"name": "game.Coin", "fields": []}]}"#,
        );

        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.load_all().unwrap();
        let registry = loader.registry(BUILTIN_REVISION).unwrap();
        assert!(registry.contains("game.Coin"));
        assert!(registry.contains("cc.Sprite"));
    }

    #[test]
    fn test_cannot_replace_builtin_class() {
        let temp_dir = TempDir::new().unwrap();
        write_table(
            temp_dir.path(),
            "label.json",
            r#"{"revision": 1, "classes": [{"name": "cc.Label", "fields": []}]}"#,
        );

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert!(matches!(err, RegistryError::Immutable { .. }));
    }

    #[test]
    fn test_rejected_file_leaves_registry_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.json");
        fs::write(
            &path,
            r#"{"revision": 1, "classes": [
                {"name": "game.Coin", "fields": []},
                {"name": "cc.Label", "fields": []}
            ]}"#,
        )
        .unwrap();

        let mut loader = SchemaLoader::builtin();
        let before = loader.registry(BUILTIN_REVISION).unwrap().len();
        let err = loader.load_table_file(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Immutable { .. }));

        let registry = loader.registry(BUILTIN_REVISION).unwrap();
        assert!(!registry.contains("game.Coin"));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_rejected_file_adds_no_revision() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dup.json");
        fs::write(
            &path,
            r#"{"revision": 3, "classes": [
                {"name": "game.Hero", "fields": []},
                {"name": "game.Hero", "fields": []}
            ]}"#,
        )
        .unwrap();

        let mut loader = SchemaLoader::builtin();
        assert!(loader.load_table_file(&path).is_err());
        assert_eq!(loader.registry(3).unwrap_err(), RegistryError::UnknownRevision(3));
        assert_eq!(loader.revisions().collect::<Vec<_>>(), vec![BUILTIN_REVISION]);
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        write_table(temp_dir.path(), "broken.json", "{ not json");

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        write_table(
            temp_dir.path(),
            "kind.json",
            r#"{"revision": 4, "classes": [{"name": "x.Y", "fields": [{"name": "a", "kind": "blob"}]}]}"#,
        );

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert!(matches!(loader.load_all(), Err(RegistryError::Malformed { .. })));
    }

    #[test]
    fn test_non_json_files_ignored() {
        let temp_dir = TempDir::new().unwrap();
        write_table(temp_dir.path(), "notes.txt", "not a table");

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 0);
    }

    #[test]
    fn test_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("absent"));
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_unknown_revision_lookup() {
        let loader = SchemaLoader::builtin();
        assert_eq!(loader.registry(7).unwrap_err(), RegistryError::UnknownRevision(7));
    }
}
