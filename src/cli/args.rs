//! CLI argument definitions using clap
//!
//! Commands:
//! - scenepack inspect <PACK> [--config <path>] [--assets] [--skip-assets] [--strict] [--json]
//! - scenepack selftest
//! - scenepack schemas [--revision <n>] [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// scenepack - inspect packed scene bundles
#[derive(Parser, Debug)]
#[command(name = "scenepack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a pack and print its scene graph
    Inspect {
        /// Path to the pack envelope (JSON)
        pack: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show the full asset table instead of referenced slots only
        #[arg(long)]
        assets: bool,

        /// Do not resolve asset references
        #[arg(long)]
        skip_assets: bool,

        /// Abort on unknown types
        #[arg(long)]
        strict: bool,

        /// Print the resolution report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode the built-in sample fragments
    Selftest,

    /// List the class registry for a revision
    Schemas {
        /// Format revision (default: the built-in revision)
        #[arg(long)]
        revision: Option<u32>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
