//! Partitioned Parquet sink

use super::columnar::{encode_parquet, records_to_batch, ParquetWriterConfig};
use super::location::StorageLocation;
use super::types::{TableSink, WriteOptions, WriteSummary};
use crate::error::{Error, Result};
use crate::transform::{CleanedTable, PartitionKey};
use crate::types::WriteMode;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

/// Writes cleaned tables as Hive-partitioned Parquet
///
/// Layout: `{prefix}/year={Y}/month={M}/part-{stamp}-{n}{codec}.parquet`
#[derive(Debug, Clone)]
pub struct PartitionedParquetSink {
    location: StorageLocation,
    options: WriteOptions,
}

impl PartitionedParquetSink {
    /// Create a sink over a location
    pub fn new(location: StorageLocation, options: WriteOptions) -> Self {
        Self { location, options }
    }

    /// Open a sink from a URL
    pub fn open(url: &str, options: WriteOptions) -> Result<Self> {
        let location =
            StorageLocation::for_write(url).map_err(|e| Error::write(url, e.to_string()))?;
        Ok(Self::new(location, options))
    }

    fn write_error(&self, message: impl Into<String>) -> Error {
        Error::write(self.location.url(), message)
    }

    /// Delete every object under `relative` except `keep`
    async fn prune(&self, relative: &str, keep: Option<&str>) -> Result<usize> {
        let existing = self
            .location
            .list(relative)
            .await
            .map_err(|e| self.write_error(e.to_string()))?;

        let mut removed = 0;
        for meta in existing {
            if keep == Some(meta.location.as_ref()) {
                continue;
            }
            self.location
                .delete(&meta.location)
                .await
                .map_err(|e| self.write_error(e.to_string()))?;
            debug!(file = %meta.location, "Removed stale file");
            removed += 1;
        }
        Ok(removed)
    }
}

/// Object name for one partition file
pub fn partition_file_name(key: &PartitionKey, stamp: &str, index: usize, codec_tag: &str) -> String {
    format!("{}/part-{stamp}-{index:05}{codec_tag}.parquet", key.path_segment())
}

#[async_trait]
impl TableSink for PartitionedParquetSink {
    async fn write_table(&self, table: &CleanedTable) -> Result<WriteSummary> {
        let mut summary = WriteSummary::default();
        if table.is_empty() {
            info!(destination = %self.location.url(), "No records to write");
            return Ok(summary);
        }

        if self.options.mode == WriteMode::Overwrite {
            summary.files_removed += self.prune("", None).await?;
        }

        let config = ParquetWriterConfig::new().with_compression(self.options.compression);
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%6f").to_string();

        for (index, (key, records)) in table.partitions().into_iter().enumerate() {
            let batch = records_to_batch(&records, &table.passthrough_columns)
                .map_err(|e| self.write_error(e.to_string()))?;
            let data =
                encode_parquet(&batch, &config).map_err(|e| self.write_error(e.to_string()))?;

            let name = partition_file_name(&key, &stamp, index, config.compression().file_tag());
            let written = self
                .location
                .put(&name, data)
                .await
                .map_err(|e| self.write_error(e.to_string()))?;

            if self.options.mode == WriteMode::OverwritePartitions {
                let keep = self.location.path(&name);
                summary.files_removed += self
                    .prune(&key.path_segment(), Some(keep.as_ref()))
                    .await?;
            }

            debug!(partition = %key, rows = records.len(), file = %written, "Wrote partition");
            summary.rows_written += records.len();
            summary.partitions.push(key);
            summary.files_written.push(written);
        }

        info!(
            destination = %self.location.url(),
            mode = %self.options.mode,
            rows = summary.rows_written,
            partitions = summary.partitions.len(),
            removed = summary.files_removed,
            "Wrote partitioned table"
        );
        Ok(summary)
    }

    fn describe(&self) -> String {
        self.location.url().to_string()
    }
}
