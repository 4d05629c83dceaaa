//! Parsing of the upstream monthly-mean CSV.
//!
//! Expected columns: year, month, decimal date, average, then anything else.
//! Rows that cannot contribute a point are skipped, never reported.

use crate::error::{FetchError, FetchResult};
use crate::models::{Point, SeriesSnapshot};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Upstream marker for a month without a measurement.
pub const MISSING_VALUE_SENTINEL: &str = "-99.99";

const DECIMAL_DATE_COLUMN: usize = 2;
const VALUE_COLUMN: usize = 3;
const MIN_FIELDS: usize = 4;

/// Parse a CSV body into a snapshot.
///
/// The first non-comment row is a header. Short rows, the missing-value
/// sentinel, empty or non-numeric values, NaN, and unparseable dates are all
/// dropped. Fails with [`FetchError::NoValidData`] when nothing survives.
pub fn parse_series(body: &str) -> FetchResult<SeriesSnapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| FetchError::Malformed(format!("row {}: {}", idx + 2, e)))?;

        match parse_row(&record) {
            Some(point) => points.push(point),
            None => skipped += 1,
        }
    }

    tracing::debug!(points = points.len(), skipped, "Parsed series");

    SeriesSnapshot::from_points(points).ok_or(FetchError::NoValidData)
}

fn parse_row(record: &csv::StringRecord) -> Option<Point> {
    if record.len() < MIN_FIELDS {
        return None;
    }

    let raw_value = record.get(VALUE_COLUMN)?;
    if raw_value.is_empty() || raw_value == MISSING_VALUE_SENTINEL {
        return None;
    }

    let value = raw_value.parse::<f64>().ok().filter(|v| !v.is_nan())?;

    let decimal_date = record.get(DECIMAL_DATE_COLUMN)?.parse::<f64>().ok()?;
    let timestamp = decimal_year_to_datetime(decimal_date)?;

    Some(Point::new(timestamp, value))
}

/// Convert a decimal year such as `2025.62` to midnight UTC of the day it falls in.
///
/// The fractional day offset is truncated, not rounded.
pub fn decimal_year_to_datetime(decimal_year: f64) -> Option<DateTime<Utc>> {
    if !decimal_year.is_finite() {
        return None;
    }

    let year = decimal_year.trunc();
    if year < i32::MIN as f64 || year > i32::MAX as f64 {
        return None;
    }
    let year = year as i32;

    let fraction = decimal_year - f64::from(year);
    let days_in_year = if is_leap_year(year) { 366.0 } else { 365.0 };
    let day_offset = (fraction * days_in_year) as i64;

    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let naive = start.checked_add_signed(Duration::days(day_offset))?;

    Some(naive.and_utc())
}

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        return true;
    }
    if year % 100 == 0 {
        return false;
    }
    year % 4 == 0
}
