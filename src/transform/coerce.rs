//! Best-effort field coercion
//!
//! Every function here maps unusable input to `None` instead of failing,
//! so a bad cell never aborts the batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time layouts tried after RFC 3339, in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-time layouts carrying a UTC offset
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Date-only layouts (midnight is assumed)
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a numeric cell
///
/// Surrounding whitespace is ignored. Non-finite results count as missing.
pub fn coerce_numeric(value: Option<&str>) -> Option<f64> {
    let parsed: f64 = value?.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Parse a timestamp cell
///
/// Values with a UTC offset keep their wall-clock time; the offset is
/// dropped, so `year`/`month` follow the time as written.
pub fn coerce_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let s = value?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(s, format) {
            return Some(ts.naive_local());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    parse_compact_date(s)
}

/// `YYYYMMDD`
fn parse_compact_date(s: &str) -> Option<NaiveDateTime> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Strip surrounding whitespace
pub fn trim_text(value: &str) -> String {
    value.trim().to_string()
}
