//! Storage adapter abstractions
//!
//! The transform job talks to storage only through these traits, so the
//! object-store implementations can be swapped for test doubles.

use crate::error::Result;
use crate::transform::{CleanedTable, PartitionKey, RawTable};
use crate::types::{Compression, WriteMode};
use async_trait::async_trait;
use serde::Serialize;

/// Options for reading delimited text
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter
    pub delimiter: char,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ReadOptions {
    /// Create default read options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Options for partitioned writes
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// How existing data is replaced
    pub mode: WriteMode,
    /// Parquet codec
    pub compression: Compression,
}

impl WriteOptions {
    /// Create default write options (`overwrite_partitions`, snappy)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the write mode
    #[must_use]
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the compression codec
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

/// What a partitioned write did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub rows_written: usize,
    pub partitions: Vec<PartitionKey>,
    pub files_written: Vec<String>,
    pub files_removed: usize,
}

/// Something a raw table can be read from
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Read every row below the location as one table
    async fn read_table(&self) -> Result<RawTable>;

    /// Location for logs
    fn describe(&self) -> String;
}

/// Something a cleaned table can be written to
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Write the table partitioned by (year, month)
    async fn write_table(&self, table: &CleanedTable) -> Result<WriteSummary>;

    /// Location for logs
    fn describe(&self) -> String;
}
