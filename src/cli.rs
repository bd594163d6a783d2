use clap::{Parser, Subcommand};
use graphdump::observability::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "graphdump")]
#[command(about = "Mirror a persistent object graph onto the file system", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $GRAPHDUMP_CONFIG or config/graphdump.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line layout
    #[arg(long, value_enum, default_value_t, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a subtree of a store as files plus JSON sidecars
    Export(ExportArgs),
    /// Import a JSON graph document into a store
    Load(LoadArgs),
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Object store to read from
    pub source: PathBuf,

    /// Output directory; its parent must exist
    pub destination: PathBuf,

    /// Keys leading from the store root to the exported object
    pub segments: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct LoadArgs {
    /// Graph document (JSON)
    pub document: PathBuf,

    /// Object store to create or update
    pub store: PathBuf,
}
