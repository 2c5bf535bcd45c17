//! Parquet encoding of cleaned records
//!
//! Partition columns (`year`, `month`) live in the object path, so they are
//! not part of the file schema.

use crate::error::Result;
use crate::transform::{
    CleanedRecord, AMOUNT, CUSTOMER_NAME, PRODUCT_NAME, TOTAL_PRICE, TRANSACTION_DATE,
};
use crate::types::Compression;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Configuration for Parquet encoding
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Snappy,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression codec
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Compression codec in use
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression.into())
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// File schema for cleaned records plus passthrough text columns
pub fn cleaned_schema(passthrough_columns: &[String]) -> Schema {
    let mut fields = vec![
        Field::new(CUSTOMER_NAME, DataType::Utf8, false),
        Field::new(PRODUCT_NAME, DataType::Utf8, false),
        Field::new(AMOUNT, DataType::Float64, false),
        Field::new(TOTAL_PRICE, DataType::Float64, true),
        Field::new(
            TRANSACTION_DATE,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
    ];
    fields.extend(
        passthrough_columns
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true)),
    );
    Schema::new(fields)
}

/// Convert cleaned records to an Arrow RecordBatch
pub fn records_to_batch(
    records: &[&CleanedRecord],
    passthrough_columns: &[String],
) -> Result<RecordBatch> {
    let schema = Arc::new(cleaned_schema(passthrough_columns));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.customer_name.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.product_name.as_str()),
        )),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.amount),
        )),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.total_price).collect::<Vec<_>>(),
        )),
        Arc::new(TimestampMicrosecondArray::from_iter_values(
            records
                .iter()
                .map(|r| r.transaction_date.and_utc().timestamp_micros()),
        )),
    ];

    for column in passthrough_columns {
        let values: StringArray = records
            .iter()
            .map(|r| r.extra.get(column).map(String::as_str))
            .collect();
        columns.push(Arc::new(values));
    }

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Encode a RecordBatch as an in-memory Parquet file
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut buf = Vec::new();
    let props = config.build_properties();

    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::NaiveDate;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::collections::BTreeMap;

    fn record(name: &str, total: Option<f64>) -> CleanedRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let mut extra = BTreeMap::new();
        extra.insert("channel".to_string(), "web".to_string());
        CleanedRecord {
            customer_name: name.to_string(),
            product_name: "Widget".to_string(),
            amount: 2.0,
            total_price: total,
            transaction_date: ts,
            year: 2024,
            month: 3,
            extra,
        }
    }

    #[test]
    fn test_schema_layout() {
        let schema = cleaned_schema(&["channel".to_string()]);
        let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec![
                "customer_name",
                "product_name",
                "amount",
                "total_price",
                "transaction_date",
                "channel"
            ]
        );
        assert!(schema.field_with_name("year").is_err());
        assert!(schema.field_with_name("total_price").unwrap().is_nullable());
        assert!(!schema.field_with_name("amount").unwrap().is_nullable());
    }

    #[test]
    fn test_records_to_batch_nulls() {
        let a = record("Alice", Some(19.99));
        let b = record("Bob", None);
        let passthrough = vec!["channel".to_string(), "coupon".to_string()];
        let batch = records_to_batch(&[&a, &b], &passthrough).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 7);

        let total = batch
            .column_by_name("total_price")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!((total.value(0) - 19.99).abs() < f64::EPSILON);
        assert!(total.is_null(1));

        let coupon = batch.column_by_name("coupon").unwrap();
        assert_eq!(coupon.null_count(), 2);
    }

    #[test]
    fn test_encode_parquet_roundtrip_rows() {
        let a = record("Alice", Some(1.0));
        let batch = records_to_batch(&[&a], &[]).unwrap();
        let config = ParquetWriterConfig::new().with_compression(Compression::Zstd);
        let bytes = encode_parquet(&batch, &config).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
            .unwrap()
            .build()
            .unwrap();
        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 1);
    }
}
