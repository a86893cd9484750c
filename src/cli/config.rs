//! Configuration file
//!
//! ```json
//! { "revision_override": null, "schema_dir": null,
//!   "unknown_types": "report", "asset_view": "referenced",
//!   "skip_assets": false }
//! ```
//!
//! Every key is optional. Command line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::AssetView;
use crate::decode::{DecodeOptions, UnknownTypePolicy};
use crate::observability::{log_event, Event};
use crate::registry::SchemaLoader;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Decode with this revision's registry instead of the document's
    #[serde(default)]
    pub revision_override: Option<u32>,

    /// Directory of extra class table files
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    /// Unknown type handling (default "report")
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,

    /// Asset table view (default "referenced")
    #[serde(default)]
    pub asset_view: AssetView,

    /// Skip asset resolution (default false)
    #[serde(default)]
    pub skip_assets: bool,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event!(Event::ConfigLoaded, path = %path.display());
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.revision_override == Some(0) {
            return Err(CliError::config_error("revision_override must be > 0"));
        }

        if let Some(dir) = &self.schema_dir {
            if !dir.is_dir() {
                return Err(CliError::config_error(format!(
                    "schema_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Decode options implied by this configuration
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            unknown_types: self.unknown_types,
            resolve_assets: !self.skip_assets,
        }
    }

    /// Schema loader with every table from `schema_dir` loaded
    pub fn schema_loader(&self) -> CliResult<SchemaLoader> {
        let mut loader = match &self.schema_dir {
            Some(dir) => SchemaLoader::new(dir),
            None => SchemaLoader::builtin(),
        };
        let loaded = loader.load_all()?;
        log_event!(Event::SchemasLoaded, classes = loaded);
        Ok(loader)
    }
}
