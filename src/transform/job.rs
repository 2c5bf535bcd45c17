//! End-to-end transform job: read, clean, write

use super::pipeline::TransformPipeline;
use super::types::TransformReport;
use crate::config::TransformConfig;
use crate::error::Result;
use crate::storage::{
    DelimitedSource, PartitionedParquetSink, ReadOptions, TableSink, TableSource, WriteOptions,
};
use tracing::info;

/// One execution of the transform job
pub struct TransformJob {
    source: Box<dyn TableSource>,
    sink: Box<dyn TableSink>,
    pipeline: TransformPipeline,
}

impl TransformJob {
    /// Create a job over any source and sink
    pub fn new(source: Box<dyn TableSource>, sink: Box<dyn TableSink>) -> Self {
        Self {
            source,
            sink,
            pipeline: TransformPipeline::new(),
        }
    }

    /// Create a job from configuration
    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        let source = DelimitedSource::open(
            &config.source,
            ReadOptions::new().with_delimiter(config.delimiter),
        )?;
        let sink = PartitionedParquetSink::open(
            &config.destination,
            WriteOptions::new()
                .with_mode(config.write_mode)
                .with_compression(config.compression),
        )?;
        Ok(Self::new(Box::new(source), Box::new(sink)))
    }

    /// Run the job to completion
    ///
    /// Read and write failures abort the job and are returned unchanged.
    pub async fn run(&self) -> Result<TransformReport> {
        info!(
            source = %self.source.describe(),
            destination = %self.sink.describe(),
            "Starting transform job"
        );

        let raw = self.source.read_table().await?;
        let (cleaned, stats) = self.pipeline.run(raw);

        info!(
            rows_in = stats.rows_in,
            rows_out = stats.rows_out,
            dropped = stats.rows_in - stats.rows_out,
            "Cleaned records"
        );

        let summary = self.sink.write_table(&cleaned).await?;

        info!("ETL job completed successfully.");

        Ok(TransformReport {
            rows_read: stats.rows_in,
            rows_dropped: stats.dropped,
            rows_written: summary.rows_written,
            partitions: summary.partitions,
            files_written: summary.files_written,
            files_removed: summary.files_removed,
        })
    }
}
