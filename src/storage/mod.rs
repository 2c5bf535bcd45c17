//! Storage adapter module
//!
//! Reads delimited text from object storage as one logical table and writes
//! cleaned tables back as Hive-partitioned Parquet.
//!
//! # Overview
//!
//! - `StorageLocation` - a prefix in S3, R2, GCS, Azure or the local filesystem
//! - `DelimitedSource` - reads every data file below a location, unioning schemas
//! - `PartitionedParquetSink` - writes `year=/month=` partitions with
//!   append, overwrite or overwrite-partitions semantics

mod columnar;
mod delimited;
mod location;
mod sink;
mod source;
mod types;

pub use columnar::{cleaned_schema, encode_parquet, records_to_batch, ParquetWriterConfig};
pub use delimited::{delimiter_byte, is_missing_marker, split_records};
pub use location::StorageLocation;
pub use sink::{partition_file_name, PartitionedParquetSink};
pub use source::{append_delimited, DelimitedSource};
pub use types::{ReadOptions, TableSink, TableSource, WriteOptions, WriteSummary};
