//! CLI command implementations
//!
//! Commands are thin: they load configuration, hand the document to the
//! decoder and print what comes back. No structural decoding happens here.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::assets::{asset_rows, AssetView};
use crate::decode::{Decoder, UnknownTypePolicy};
use crate::document::parse_document;
use crate::observability::{log_event, Event};
use crate::registry::{ClassRegistry, BUILTIN_REVISION};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::render::{render_assets, render_report, render_schemas, render_tree};
use super::selftest::run_selftest;

/// Flags of the inspect command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectFlags {
    pub full_assets: bool,
    pub skip_assets: bool,
    pub strict: bool,
    pub json: bool,
}

/// Main CLI entry point
///
/// Installs the log subscriber, parses arguments and dispatches to the
/// appropriate command. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Logs go to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Inspect {
            pack,
            config,
            assets,
            skip_assets,
            strict,
            json,
        } => {
            let flags = InspectFlags {
                full_assets: assets,
                skip_assets,
                strict,
                json,
            };
            let output = inspect(&pack, config.as_deref(), flags)?;
            write_stdout(&output)
        }
        Command::Selftest => {
            let output = selftest()?;
            write_stdout(&output)
        }
        Command::Schemas { revision, config } => {
            let output = schemas(revision, config.as_deref())?;
            write_stdout(&output)
        }
    }
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Decode a pack and render it.
///
/// Flags override the configuration file.
pub fn inspect(pack: &Path, config_path: Option<&Path>, flags: InspectFlags) -> CliResult<String> {
    let mut config = Config::load_or_default(config_path)?;
    if flags.full_assets {
        config.asset_view = AssetView::Full;
    }
    if flags.skip_assets {
        config.skip_assets = true;
    }
    if flags.strict {
        config.unknown_types = UnknownTypePolicy::Fail;
    }

    let text = fs::read_to_string(pack)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", pack.display(), e)))?;
    let document = parse_document(&text).map_err(|e| {
        log_event!(Event::DocumentRejected, reason = %e);
        e
    })?;
    log_event!(
        Event::DocumentParsed,
        revision = document.revision,
        nodes = document.node_count()
    );

    let loader = config.schema_loader()?;
    let registry = loader.registry(config.revision_override.unwrap_or(document.revision))?;
    let graph = Decoder::new(registry)
        .with_options(config.decode_options())
        .decode(&document)?;

    if flags.json {
        let mut out = serde_json::to_string_pretty(graph.report())?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = render_tree(&graph);
    if !config.skip_assets {
        out.push('\n');
        let rows = asset_rows(&graph, &document.asset_table, config.asset_view);
        out.push_str(&render_assets(&rows, config.asset_view));
    }
    out.push('\n');
    out.push_str(&render_report(graph.report()));
    Ok(out)
}

/// Run the built-in self-test against the built-in registry
pub fn selftest() -> CliResult<String> {
    let registry = ClassRegistry::builtin();
    let results = run_selftest(&registry);

    let mut out = String::from("Self-test:\n");
    for result in &results {
        match &result.failure {
            None => out.push_str(&format!("  ok    {}\n", result.name)),
            Some(reason) => out.push_str(&format!("  FAIL  {}: {}\n", result.name, reason)),
        }
    }

    let failed = results.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        // Print what ran before reporting failure.
        write_stdout(&out)?;
        return Err(CliError::SelftestFailed {
            failed,
            total: results.len(),
        });
    }
    out.push_str(&format!("{} cases passed\n", results.len()));
    Ok(out)
}

/// List the classes of one revision
pub fn schemas(revision: Option<u32>, config_path: Option<&Path>) -> CliResult<String> {
    let config = Config::load_or_default(config_path)?;
    let loader = config.schema_loader()?;
    let revision = revision
        .or(config.revision_override)
        .unwrap_or(BUILTIN_REVISION);
    Ok(render_schemas(loader.registry(revision)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_pack(temp_dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join("pack.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn sample_pack() -> serde_json::Value {
        json!({
            "pool": ["Root", null, 0, "Mystery"],
            "classTypes": ["cc.Sprite", "game.Mystery"],
            "components": [
                {"type": 0, "fields": [1, 1, 1, 1, 1, 1, 1, 1, 2]},
                {"type": 1, "fields": [3]}
            ],
            "nodeRecords": [{"fields": [0], "components": [0, 1]}],
            "assetTable": {"0": "uuid-frame", "7": "uuid-unused"}
        })
    }

    #[test]
    fn test_inspect_renders_tree_assets_and_report() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, sample_pack());

        let out = inspect(&pack, None, InspectFlags::default()).unwrap();
        assert!(out.contains("node0 \"Root\""));
        assert!(out.contains("referenced only"));
        assert!(out.contains("uuid-frame"));
        assert!(!out.contains("uuid-unused"));
        assert!(out.contains("unknown types:     1"));
    }

    #[test]
    fn test_inspect_full_asset_table() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, sample_pack());
        let flags = InspectFlags {
            full_assets: true,
            ..InspectFlags::default()
        };
        let out = inspect(&pack, None, flags).unwrap();
        assert!(out.contains("full table"));
        assert!(out.contains("uuid-unused"));
    }

    #[test]
    fn test_inspect_strict_fails() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, sample_pack());
        let flags = InspectFlags {
            strict: true,
            ..InspectFlags::default()
        };
        let err = inspect(&pack, None, flags).unwrap_err();
        assert_eq!(err.code(), "SCENEPACK_CLI_DECODE_FAILED");
    }

    #[test]
    fn test_inspect_json_report() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, sample_pack());
        let flags = InspectFlags {
            json: true,
            ..InspectFlags::default()
        };
        let out = inspect(&pack, None, flags).unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["resolved_asset_count"], 1);
        assert_eq!(report["unknown_type_count"], 1);
        assert_eq!(report["issues"][0]["code"], "PACK_UNKNOWN_TYPE");
    }

    #[test]
    fn test_inspect_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, sample_pack());
        let config = temp_dir.path().join("scenepack.json");
        fs::write(&config, r#"{"skip_assets": true}"#).unwrap();

        let out = inspect(&pack, Some(&config), InspectFlags::default()).unwrap();
        assert!(!out.contains("File assets"));
        assert!(out.contains("resolved assets:   0"));
    }

    #[test]
    fn test_inspect_rejects_bad_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, json!({"pool": [{"bogus": 1}]}));
        let err = inspect(&pack, None, InspectFlags::default()).unwrap_err();
        assert!(matches!(err, CliError::Envelope(_)));
    }

    #[test]
    fn test_inspect_unknown_revision() {
        let temp_dir = TempDir::new().unwrap();
        let pack = write_pack(&temp_dir, json!({"revision": 9}));
        let err = inspect(&pack, None, InspectFlags::default()).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }

    #[test]
    fn test_inspect_missing_pack() {
        let temp_dir = TempDir::new().unwrap();
        let err = inspect(&temp_dir.path().join("absent.json"), None, InspectFlags::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_selftest_passes() {
        let out = selftest().unwrap();
        assert!(out.contains("cases passed"));
        assert!(!out.contains("FAIL"));
    }

    #[test]
    fn test_schemas_default_revision() {
        let out = schemas(None, None).unwrap();
        assert!(out.contains("cc.Sprite"));
        assert!(matches!(schemas(Some(5), None), Err(CliError::Schema(_))));
    }
}
