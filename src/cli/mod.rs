//! CLI module for scenepack
//!
//! Provides command-line interface for:
//! - inspect: decode a pack and print its scene graph, assets and report
//! - selftest: decode the built-in sample fragments
//! - schemas: list the class registry for a revision

mod args;
mod commands;
mod config;
mod errors;
mod render;
mod selftest;

pub use args::{Cli, Command};
pub use commands::{inspect, run, run_command, schemas, selftest, InspectFlags};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use render::{render_assets, render_report, render_schemas, render_tree};
pub use selftest::{run_selftest, CaseResult};
