//! Record and table types for the transform stage
//!
//! Raw records hold untyped text exactly as read; cleaned records carry
//! the typed, validated fields plus the derived partition columns.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Customer name column
pub const CUSTOMER_NAME: &str = "customer_name";
/// Product name column
pub const PRODUCT_NAME: &str = "product_name";
/// Quantity/amount column
pub const AMOUNT: &str = "amount";
/// Line total column
pub const TOTAL_PRICE: &str = "total_price";
/// Transaction timestamp column
pub const TRANSACTION_DATE: &str = "transaction_date";
/// Derived partition column (calendar year)
pub const YEAR: &str = "year";
/// Derived partition column (calendar month, 1-12)
pub const MONTH: &str = "month";

/// Columns with typed handling; everything else passes through as text
pub const KNOWN_COLUMNS: [&str; 5] = [
    CUSTOMER_NAME,
    PRODUCT_NAME,
    AMOUNT,
    TOTAL_PRICE,
    TRANSACTION_DATE,
];

/// Partition columns, in path order
pub const PARTITION_COLUMNS: [&str; 2] = [YEAR, MONTH];

// ============================================================================
// Raw Records
// ============================================================================

/// One untyped input row
///
/// `None` means the value is missing: the column was absent from the file,
/// the row was short, or the cell held a missing-value marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub amount: Option<String>,
    pub total_price: Option<String>,
    pub transaction_date: Option<String>,
    /// Non-missing values of every other column
    pub extra: BTreeMap<String, String>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        let mut record = Self::new();
        for (column, value) in pairs {
            record.set(column.as_ref(), value);
        }
        record
    }

    /// Set a column value
    pub fn set(&mut self, column: &str, value: Option<String>) {
        match column {
            CUSTOMER_NAME => self.customer_name = value,
            PRODUCT_NAME => self.product_name = value,
            AMOUNT => self.amount = value,
            TOTAL_PRICE => self.total_price = value,
            TRANSACTION_DATE => self.transaction_date = value,
            other => match value {
                Some(v) => {
                    self.extra.insert(other.to_string(), v);
                }
                None => {
                    self.extra.remove(other);
                }
            },
        }
    }

    /// Set a column value (builder style)
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, Some(value.into()));
        self
    }

    /// Get a column value
    pub fn get(&self, column: &str) -> Option<&str> {
        match column {
            CUSTOMER_NAME => self.customer_name.as_deref(),
            PRODUCT_NAME => self.product_name.as_deref(),
            AMOUNT => self.amount.as_deref(),
            TOTAL_PRICE => self.total_price.as_deref(),
            TRANSACTION_DATE => self.transaction_date.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}

/// All raw rows from one source location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Union of column names in first-seen order
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column if not already present
    pub fn add_column(&mut self, column: &str) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
    }

    /// Columns that carry no typed handling
    pub fn passthrough_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| {
                !KNOWN_COLUMNS.contains(&c.as_str()) && !PARTITION_COLUMNS.contains(&c.as_str())
            })
            .cloned()
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Cleaned Records
// ============================================================================

/// A typed row that passed every filter
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub customer_name: String,
    pub product_name: String,
    pub amount: f64,
    pub total_price: Option<f64>,
    pub transaction_date: NaiveDateTime,
    pub year: i32,
    pub month: u32,
    pub extra: BTreeMap<String, String>,
}

impl CleanedRecord {
    /// Partition this record belongs to
    pub fn partition_key(&self) -> PartitionKey {
        PartitionKey {
            year: self.year,
            month: self.month,
        }
    }
}

/// Cleaned rows ready for partitioned storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTable {
    /// Text columns carried through from the input, in input order
    pub passthrough_columns: Vec<String>,
    pub records: Vec<CleanedRecord>,
}

impl CleanedTable {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Group records by partition, ordered by key
    pub fn partitions(&self) -> BTreeMap<PartitionKey, Vec<&CleanedRecord>> {
        let mut groups: BTreeMap<PartitionKey, Vec<&CleanedRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.partition_key()).or_default().push(record);
        }
        groups
    }
}

// ============================================================================
// Partition Key
// ============================================================================

/// The (year, month) pair a cleaned record is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
}

impl PartitionKey {
    /// Create a partition key
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Derive the key from a timestamp
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Hive-style path segment, e.g. `year=2024/month=3`
    pub fn path_segment(&self) -> String {
        format!("{YEAR}={}/{MONTH}={}", self.year, self.month)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_segment())
    }
}

// ============================================================================
// Drop Accounting
// ============================================================================

/// Why a raw record did not survive cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingCustomerName,
    MissingProductName,
    MissingAmount,
    MissingTransactionDate,
}

impl DropReason {
    /// Name of the field that caused the drop
    pub fn column(self) -> &'static str {
        match self {
            Self::MissingCustomerName => CUSTOMER_NAME,
            Self::MissingProductName => PRODUCT_NAME,
            Self::MissingAmount => AMOUNT,
            Self::MissingTransactionDate => TRANSACTION_DATE,
        }
    }
}

/// Outcome of one transform job execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub rows_read: usize,
    pub rows_dropped: BTreeMap<DropReason, usize>,
    pub rows_written: usize,
    pub partitions: Vec<PartitionKey>,
    pub files_written: Vec<String>,
    pub files_removed: usize,
}

impl TransformReport {
    /// Total dropped rows across all reasons
    pub fn total_dropped(&self) -> usize {
        self.rows_dropped.values().sum()
    }
}
