//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Extract registrations from the service packages and write the index
//! - `lookup`: Find an identifier in a previously written index
//! - `init`: Initialize provscan configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(args)) => args.common.verbose,
            Some(Command::Lookup(args)) => args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `scan` and `lookup`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Provider source root; the config file is searched from here upwards
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Service packages directory, relative to the source root (overrides config file)
    #[arg(long)]
    pub service_root: Option<PathBuf>,

    /// Index output directory, relative to the source root (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Only scan this package (repeatable; overrides config file)
    #[arg(long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Number of worker threads (default: one per CPU)
    #[arg(short, long, env = "PROVSCAN_JOBS")]
    pub jobs: Option<usize>,

    /// Scan and report without writing the index
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Resource identifier, e.g. aws_vpc
    pub identifier: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Print matching entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan service packages and write the registration index
    Scan(ScanArgs),
    /// Look up an identifier in the registration index
    Lookup(LookupArgs),
    /// Initialize a new .provscanrc.json configuration file
    Init,
}
