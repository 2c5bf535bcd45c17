//! Delimited-text decoding
//!
//! Quoted fields may contain the delimiter, doubled quotes and line breaks.
//! Cells are kept verbatim; missing-value markers decode to `None`.

use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cell values read as missing
static MISSING_MARKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// Whether a raw cell denotes a missing value
pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(value)
}

/// Convert a raw cell into an optional value
pub fn to_cell(value: String) -> Option<String> {
    if is_missing_marker(&value) {
        None
    } else {
        Some(value)
    }
}

/// Convert a delimiter character into the single byte the reader expects
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            Error::invalid_value(
                "transform.delimiter",
                format!("{delimiter:?} is not a single-byte ASCII character"),
            )
        })
}

/// Split a delimited-text body into records of raw fields
///
/// Records may differ in length. Blank lines are skipped.
pub fn split_records(body: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_byte(delimiter)?)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record?;
        records.push(record.iter().map(String::from).collect());
    }
    Ok(records)
}
