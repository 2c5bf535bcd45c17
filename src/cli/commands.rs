//! CLI commands and argument parsing

use crate::types::WriteMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curate pipeline CLI
#[derive(Parser, Debug)]
#[command(name = "curate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the transform job: read raw files, clean, write partitioned Parquet
    Transform {
        /// Raw input location (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(long)]
        source: Option<String>,

        /// Curated output location (local path or cloud URL)
        #[arg(long)]
        destination: Option<String>,

        /// How existing output is replaced
        #[arg(long, value_enum)]
        write_mode: Option<WriteModeArg>,
    },

    /// Start the job, wait for it, then start the crawler
    Trigger {
        /// Trigger payload (JSON), logged and otherwise ignored
        #[arg(long)]
        payload: Option<String>,

        /// Seconds between job state checks
        #[arg(long)]
        poll_interval: Option<u64>,
    },

    /// Start HTTP server exposing the trigger
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Validate and print the resolved configuration
    Validate,
}

/// Write mode as a CLI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WriteModeArg {
    Append,
    Overwrite,
    OverwritePartitions,
}

impl From<WriteModeArg> for WriteMode {
    fn from(arg: WriteModeArg) -> Self {
        match arg {
            WriteModeArg::Append => WriteMode::Append,
            WriteModeArg::Overwrite => WriteMode::Overwrite,
            WriteModeArg::OverwritePartitions => WriteMode::OverwritePartitions,
        }
    }
}
