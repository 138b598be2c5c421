//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (`--json`, `--verbose`, `-D`, `--project`) are inherited by all subcommands
//! - Every lifecycle command reads `mule-deploy.toml` from the project root

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// mule-deployer - validate, package and deploy Mule applications
#[derive(Parser, Debug)]
#[command(name = "mule-deployer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON events and a JSON result)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override property (repeatable), e.g. -D anypoint.environment=Production
    #[arg(short = 'D', value_name = "KEY=VALUE", global = true)]
    pub properties: Vec<String>,

    /// Project root holding mule-deploy.toml
    #[arg(short, long, global = true, default_value = ".")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Archive content options shared by packaging commands
#[derive(Args, Debug, Clone, Default)]
pub struct ArchiveArgs {
    /// Include glob for directory sources (repeatable)
    #[arg(long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Exclude glob for directory sources (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the project layout and dependencies
    Validate,

    /// Validate and write the deployable archive
    Package {
        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Print the fully resolved deployment configuration
    Resolve,

    /// Deploy the project, replacing an existing deployment
    Deploy {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Deploy the prebuilt artifact instead of packaging first
        #[arg(long)]
        no_package: bool,

        /// Further project roots, deployed concurrently with --project
        #[arg(value_name = "PROJECT")]
        also: Vec<PathBuf>,
    },

    /// Remove the application from its target
    Undeploy,

    /// Undeploy, then deploy fresh
    Redeploy {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Deploy the prebuilt artifact instead of packaging first
        #[arg(long)]
        no_package: bool,
    },
}
