// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Curate Pipeline
//!
//! A two-stage batch pipeline for e-commerce transaction data.
//!
//! ## Stages
//!
//! - **Transform**: read raw delimited files from object storage, coerce
//!   types, drop incomplete rows, trim product names, derive `year`/`month`
//!   and write Hive-partitioned Parquet, replacing only the partitions present
//!   in the new data
//! - **Orchestrate**: start the transform job on the job service, poll it to a
//!   terminal state and start the catalog crawler when it succeeded
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use curate_pipeline::{config::TransformConfig, transform::TransformJob, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = TransformConfig {
//!         source: "./raw".to_string(),
//!         destination: "./curated".to_string(),
//!         ..TransformConfig::default()
//!     };
//!     let report = TransformJob::from_config(&config)?.run().await?;
//!     println!("{} rows written", report.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                OrchestrationHandler (trigger)                │
//! │  submit → poll every 15s → SUCCEEDED → start crawler → 200   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │ runs
//! ┌────────────────────┬────────┴───────────┬────────────────────┐
//! │  DelimitedSource   │ TransformPipeline  │  PartitionedSink   │
//! ├────────────────────┼────────────────────┼────────────────────┤
//! │ list + parse       │ coerce types       │ year=/month= dirs  │
//! │ schema union       │ drop incomplete    │ overwrite touched  │
//! │ NA markers         │ trim, derive Y/M   │ partitions only    │
//! └────────────────────┴────────────────────┴────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pipeline configuration
pub mod config;

/// Object storage, CSV input and Parquet output
pub mod storage;

/// Cleaning rules and the transform job
pub mod transform;

/// Job orchestration handler and service clients
pub mod orchestrate;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::PipelineConfig;
pub use orchestrate::{HandlerResponse, OrchestrationHandler};
pub use transform::{TransformJob, TransformReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
