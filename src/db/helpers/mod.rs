use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Datelike, SecondsFormat, Utc};

const MIN_STORED_YEAR: i32 = 0;
const MAX_STORED_YEAR: i32 = 9999;

/// Fixed-width UTC timestamps keep lexical and chronological order identical,
/// which the range queries on `recorded_at` rely on. Years outside 0..=9999 would
/// widen the text, so they are rejected.
pub fn format_datetime(value: DateTime<Utc>) -> Result<String> {
    if !(MIN_STORED_YEAR..=MAX_STORED_YEAR).contains(&value.year()) {
        bail!("timestamp {value} is outside the storable years {MIN_STORED_YEAR}..={MAX_STORED_YEAR}");
    }
    Ok(value.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn non_negative(value: f64, field: &str) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(anyhow!("{field} must be a finite non-negative number, got {value}"))
    }
}
