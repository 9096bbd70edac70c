//! Timestamp value generators.

use chrono::{DateTime, Utc};
use fill_core::{FieldValue, ValueError};
use rand::Rng;

/// Generate the current UTC timestamp.
///
/// This is NOT deterministic - each call returns the current time.
pub fn generate_timestamp_now() -> FieldValue {
    FieldValue::DateTime(Utc::now())
}

/// Generate a random timestamp (second precision) in the given range.
///
/// The start and end are RFC 3339 timestamps or `YYYY-MM-DD` dates.
pub fn generate_timestamp_range<R: Rng>(
    rng: &mut R,
    start: &str,
    end: &str,
) -> Result<FieldValue, ValueError> {
    let start = parse_timestamp("start", start)?;
    let end = parse_timestamp("end", end)?;

    let (start_ts, end_ts) = (start.timestamp(), end.timestamp());
    if start_ts >= end_ts {
        return Ok(FieldValue::DateTime(start));
    }

    let random_ts = rng.gen_range(start_ts..=end_ts);
    let dt = DateTime::from_timestamp(random_ts, 0).unwrap_or(start);
    Ok(FieldValue::DateTime(dt))
}

/// Parse a timestamp string in the accepted formats.
pub fn parse_timestamp(name: &str, s: &str) -> Result<DateTime<Utc>, ValueError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValueError::InvalidArgument {
            name: name.to_string(),
            reason: format!("'{s}' is neither RFC 3339 nor YYYY-MM-DD"),
        })
}
