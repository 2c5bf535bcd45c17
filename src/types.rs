//! Common types used throughout the curate pipeline
//!
//! This module contains shared enums used by configuration,
//! storage and the command-line interface.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Write Mode
// ============================================================================

/// How cleaned data is written to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Add new files next to existing ones
    Append,
    /// Remove everything under the destination, then write
    Overwrite,
    /// Replace only the partitions present in the new data
    #[default]
    OverwritePartitions,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Append => "append",
            Self::Overwrite => "overwrite",
            Self::OverwritePartitions => "overwrite_partitions",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Compression
// ============================================================================

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl Compression {
    /// Codec tag used in output file names (`part-...{tag}.parquet`)
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Snappy => ".snappy",
            Self::Zstd => ".zstd",
            Self::Gzip => ".gz",
            Self::None => "",
        }
    }
}

impl From<Compression> for parquet::basic::Compression {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Snappy => parquet::basic::Compression::SNAPPY,
            Compression::Zstd => {
                parquet::basic::Compression::ZSTD(parquet::basic::ZstdLevel::default())
            }
            Compression::Gzip => {
                parquet::basic::Compression::GZIP(parquet::basic::GzipLevel::default())
            }
            Compression::None => parquet::basic::Compression::UNCOMPRESSED,
        }
    }
}
