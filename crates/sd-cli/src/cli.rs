use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "smelldeck", version, about = "Code smell reports and portfolio statistics")]
pub struct Cli {
    /// Engine configuration (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a report from analyzer findings
    Report {
        /// JSON array of smells, or an analyzer response with `codeSmells`
        #[arg(long, value_name = "FILE")]
        smells: PathBuf,
        /// Number of analyzed source files
        #[arg(long, conflicts_with = "source_dir", required_unless_present = "source_dir")]
        total_files: Option<usize>,
        /// Count source files under this directory instead
        #[arg(long, value_name = "DIR")]
        source_dir: Option<PathBuf>,
    },
    /// Aggregate reports, one per project, into dashboard statistics
    Portfolio {
        /// Report JSON files
        #[arg(long, num_args = 0.., value_name = "FILE")]
        reports: Vec<PathBuf>,
    },
    /// List the analyzable source files under a directory
    Scan {
        dir: PathBuf,
    },
}
