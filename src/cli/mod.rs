//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `transform` - Clean raw files into partitioned Parquet
//! - `trigger` - Run the job, wait for it, start the crawler
//! - `serve` - Start HTTP server mode (`POST /trigger`)
//! - `validate` - Check and print the resolved configuration

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, WriteModeArg};
pub use runner::{build_handler, Runner};
pub use server::{router, serve};
