use crate::config::SyncConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "syncdir")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: SubCommandArgs,
}

#[derive(Subcommand, Debug)]
pub enum SubCommandArgs {
    /// Copy/sync files and directories
    Cp(CpArgs),

    /// Show version and platform
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CpArgs {
    /// Recursive (required when SRC is a directory)
    #[arg(short = 'r')]
    pub recursive: bool,

    /// Mirror mode (delete files/dirs not present in SRC)
    #[arg(long)]
    pub mirror: bool,

    /// Show actions without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exclude pattern, repeatable, e.g. ".git", "*.tmp", "node_modules"
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Use SHA-1 content digests to decide copy (slower, safer)
    #[arg(long)]
    pub checksum: bool,

    /// RON profile with default options (default: ~/.config/syncdir/config.ron)
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Source file or directory
    #[arg(value_name = "SRC")]
    pub source: PathBuf,

    /// Destination path
    #[arg(value_name = "DST")]
    pub destination: PathBuf,
}

impl CpArgs {
    /// Options as given on the command line, before any profile is applied.
    pub fn to_config(&self) -> SyncConfig {
        SyncConfig {
            recursive: self.recursive,
            mirror: self.mirror,
            dry_run: self.dry_run,
            verbose: self.verbose,
            use_checksum: self.checksum,
            exclude_patterns: self.excludes.clone(),
        }
    }
}

pub fn get_env_args() -> Args {
    Args::parse()
}
