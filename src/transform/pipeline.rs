//! Cleaning, typing and partition derivation

use super::coerce::{coerce_numeric, coerce_timestamp, trim_text};
use super::types::{
    CleanedRecord, CleanedTable, DropReason, PartitionKey, RawRecord, RawTable,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Counters from one pipeline pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

/// Converts raw rows into cleaned, partitionable rows
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformPipeline;

impl TransformPipeline {
    /// Create a new pipeline
    pub fn new() -> Self {
        Self
    }

    /// Clean a single record
    ///
    /// Coerces `amount`, `total_price` and `transaction_date`, rejects the
    /// record when a required field is missing, trims `product_name` and
    /// derives `year`/`month`. An unparsable `total_price` becomes `None`
    /// without rejecting the record.
    pub fn clean_record(&self, raw: RawRecord) -> Result<CleanedRecord, DropReason> {
        let amount = coerce_numeric(raw.amount.as_deref());
        let total_price = coerce_numeric(raw.total_price.as_deref());
        let transaction_date = coerce_timestamp(raw.transaction_date.as_deref());

        let customer_name = raw.customer_name.ok_or(DropReason::MissingCustomerName)?;
        let product_name = raw.product_name.ok_or(DropReason::MissingProductName)?;
        let amount = amount.ok_or(DropReason::MissingAmount)?;
        let transaction_date = transaction_date.ok_or(DropReason::MissingTransactionDate)?;

        let key = PartitionKey::from_timestamp(&transaction_date);

        Ok(CleanedRecord {
            customer_name,
            product_name: trim_text(&product_name),
            amount,
            total_price,
            transaction_date,
            year: key.year,
            month: key.month,
            extra: raw.extra,
        })
    }

    /// Clean a whole table
    pub fn run(&self, table: RawTable) -> (CleanedTable, CleanStats) {
        let passthrough_columns = table.passthrough_columns();
        let mut stats = CleanStats {
            rows_in: table.rows.len(),
            ..CleanStats::default()
        };

        let mut records = Vec::with_capacity(table.rows.len());
        for (index, raw) in table.rows.into_iter().enumerate() {
            match self.clean_record(raw) {
                Ok(mut record) => {
                    record
                        .extra
                        .retain(|column, _| passthrough_columns.contains(column));
                    records.push(record);
                }
                Err(reason) => {
                    debug!(row = index, column = reason.column(), "Dropping record");
                    *stats.dropped.entry(reason).or_default() += 1;
                }
            }
        }

        stats.rows_out = records.len();
        let cleaned = CleanedTable {
            passthrough_columns,
            records,
        };
        (cleaned, stats)
    }
}
