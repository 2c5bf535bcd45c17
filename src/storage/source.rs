//! Delimited-text table source

use super::delimited::{split_records, to_cell};
use super::location::StorageLocation;
use super::types::{ReadOptions, TableSource};
use crate::error::{Error, Result};
use crate::transform::{RawRecord, RawTable};
use async_trait::async_trait;
use object_store::path::Path as ObjectPath;
use tracing::{debug, info, warn};

/// Reads all delimited files below a location into one table
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    location: StorageLocation,
    options: ReadOptions,
}

impl DelimitedSource {
    /// Create a source over a location
    pub fn new(location: StorageLocation, options: ReadOptions) -> Self {
        Self { location, options }
    }

    /// Open a source from a URL
    pub fn open(url: &str, options: ReadOptions) -> Result<Self> {
        let location =
            StorageLocation::for_read(url).map_err(|e| Error::source_read(url, e.to_string()))?;
        Ok(Self::new(location, options))
    }

    fn read_error(&self, message: impl Into<String>) -> Error {
        Error::source_read(self.location.url(), message)
    }
}

#[async_trait]
impl TableSource for DelimitedSource {
    async fn read_table(&self) -> Result<RawTable> {
        let objects = self
            .location
            .list("")
            .await
            .map_err(|e| self.read_error(e.to_string()))?;

        let root = self.location.path("");
        let files: Vec<_> = objects
            .into_iter()
            .filter(|meta| !is_hidden(&root, &meta.location))
            .collect();

        if files.is_empty() {
            return Err(self.read_error("no data files found"));
        }

        let mut table = RawTable::new();
        for meta in &files {
            let bytes = self
                .location
                .get(&meta.location)
                .await
                .map_err(|e| self.read_error(e.to_string()))?;
            let body = std::str::from_utf8(&bytes).map_err(|e| {
                self.read_error(format!("{} is not valid UTF-8: {e}", meta.location))
            })?;

            let rows = append_delimited(&mut table, body, self.options.delimiter)
                .map_err(|e| self.read_error(format!("{}: {e}", meta.location)))?;
            debug!(file = %meta.location, rows, "Read source file");
        }

        info!(
            source = %self.location.url(),
            files = files.len(),
            rows = table.len(),
            columns = table.columns.len(),
            "Read raw table"
        );
        Ok(table)
    }

    fn describe(&self) -> String {
        self.location.url().to_string()
    }
}

/// Whether any segment below the root starts with `.` or `_`
///
/// Covers marker files like `_SUCCESS` and staging directories like
/// `_temporary/` or `.spark-staging/`.
fn is_hidden(root: &ObjectPath, path: &ObjectPath) -> bool {
    match path.prefix_match(root) {
        Some(mut parts) => parts.any(|part| {
            let part = part.as_ref();
            part.starts_with('.') || part.starts_with('_')
        }),
        None => true,
    }
}

/// Decode one file body and append its rows to the table
///
/// Returns the number of rows appended.
pub fn append_delimited(table: &mut RawTable, body: &str, delimiter: char) -> Result<usize> {
    let mut records = split_records(body, delimiter)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(0);
    };

    let mut columns: Vec<Option<String>> = Vec::with_capacity(header.len());
    for name in header {
        if columns.iter().flatten().any(|c| *c == name) {
            warn!(column = %name, "Ignoring duplicate column");
            columns.push(None);
        } else {
            table.add_column(&name);
            columns.push(Some(name));
        }
    }

    let mut appended = 0;
    for fields in records {
        if fields.len() > columns.len() {
            warn!(
                expected = columns.len(),
                found = fields.len(),
                "Ignoring surplus fields"
            );
        }

        let mut values = fields.into_iter();
        let record = RawRecord::from_pairs(columns.iter().filter_map(|column| {
            let value = values.next().and_then(to_cell);
            column.as_deref().map(|name| (name, value))
        }));
        table.rows.push(record);
        appended += 1;
    }
    Ok(appended)
}
