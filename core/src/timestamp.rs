//! Timestamp parsing at the loader boundary and the canonical string form
//! used as the reference key in result tables.

use crate::{
    error::{BalanceError, BalanceResult},
    types::Timestamp,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a ledger timestamp.
///
/// Accepts a bare date (midnight), a date-time with either a space or `T`
/// separator and optional fractional seconds, or RFC 3339 with an offset,
/// which is normalised to UTC. Leap seconds (`:60`) are rejected: day
/// bucketing needs every instant to sit strictly inside its calendar day.
pub fn parse_timestamp(raw: &str) -> BalanceResult<Timestamp> {
    match parse_any(raw.trim()) {
        Some(ts) if ts.nanosecond() < 1_000_000_000 => Ok(ts),
        _ => Err(BalanceError::TimestampParse { value: raw.to_string() }),
    }
}

fn parse_any(value: &str) -> Option<Timestamp> {
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ts);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    DateTime::parse_from_rfc3339(value).ok().map(|ts| ts.naive_utc())
}

/// Render a timestamp the way reference keys have always been written:
/// seconds resolution, widened to micro- or nanoseconds only when needed.
pub fn canonical_string(ts: &Timestamp) -> String {
    let nanos = ts.nanosecond();
    if nanos == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else if nanos % 1_000 == 0 {
        ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.9f").to_string()
    }
}
