//! Transform module
//!
//! Turns raw transaction rows into typed, validated rows partitioned by
//! (year, month).
//!
//! # Overview
//!
//! For each raw record, in order:
//! 1. `amount` and `total_price` are parsed as numbers; failures become missing
//! 2. `transaction_date` is parsed as a timestamp; failures become missing
//! 3. records missing `customer_name`, `product_name`, `amount` or
//!    `transaction_date` are dropped (`total_price` may stay missing)
//! 4. `product_name` is trimmed
//! 5. `year` and `month` are derived from `transaction_date`

mod coerce;
mod job;
mod pipeline;
mod types;

pub use coerce::{coerce_numeric, coerce_timestamp, trim_text};
pub use job::TransformJob;
pub use pipeline::{CleanStats, TransformPipeline};
pub use types::{
    CleanedRecord, CleanedTable, DropReason, PartitionKey, RawRecord, RawTable, TransformReport,
    AMOUNT, CUSTOMER_NAME, KNOWN_COLUMNS, MONTH, PARTITION_COLUMNS, PRODUCT_NAME, TOTAL_PRICE,
    TRANSACTION_DATE, YEAR,
};
