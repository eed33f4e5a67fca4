//! Window averaging over day buckets.
//!
//! A "day" starts at the clock time of `window_start`, not at midnight.
//! Every transaction timestamp is shifted forward by the same delta that
//! moves `window_start` onto the next midnight, and the shifted timestamp's
//! calendar date is its bucket. A window opening at 21:30 therefore groups
//! 21:30 → 21:30 the next day as one bucket.
//!
//! Days without movement are still buckets: a flat day weighs on the
//! average exactly as much as a busy one.

use crate::{
    ledger::LedgerEntry,
    types::{Amount, Timestamp},
};
use chrono::{Duration, NaiveDate, Timelike};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverage {
    pub average:           Amount,
    /// Zero when the window held no transactions and no days were enumerated.
    pub bucket_count:      usize,
    pub transaction_count: usize,
}

/// Delta that moves `window_start` onto the next midnight. Always in
/// `(0, 24h]`: a window opening exactly at midnight shifts by a full day.
pub fn day_shift(window_start: Timestamp) -> Duration {
    let time = window_start.time();
    let since_midnight = Duration::seconds(i64::from(time.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(time.nanosecond()));
    Duration::days(1) - since_midnight
}

/// First midnight strictly after `window_start`.
pub fn day_anchor(window_start: Timestamp) -> Timestamp {
    window_start + day_shift(window_start)
}

/// Calendar date of the bucket a transaction falls into.
pub fn bucket_date(value_timestamp: Timestamp, shift: Duration) -> NaiveDate {
    (value_timestamp + shift).date()
}

/// Mean of end-of-day balances across `[window_start, reference]`.
///
/// `entries` must be the account's transactions with
/// `window_start <= ts <= reference`, ascending by timestamp.
pub fn average_window(
    start_balance: Amount,
    window_start: Timestamp,
    reference: Timestamp,
    entries: &[LedgerEntry],
) -> WindowAverage {
    if entries.is_empty() {
        return WindowAverage {
            average: start_balance,
            bucket_count: 0,
            transaction_count: 0,
        };
    }

    let shift = day_shift(window_start);
    let first_day = (window_start + shift).date();
    let last_day = reference.date().max(first_day);
    let day_count = (last_day - first_day).num_days() as usize + 1;
    let mut buckets: Vec<Amount> = vec![0.0; day_count];

    for (i, entry) in entries.iter().enumerate() {
        // The first transaction sitting on window_start is already part of
        // start_balance; it keeps its bucket but contributes nothing.
        let amount = if i == 0 && entry.value_timestamp == window_start {
            0.0
        } else {
            entry.amount
        };

        let offset = (bucket_date(entry.value_timestamp, shift) - first_day).num_days();
        let Ok(offset) = usize::try_from(offset) else {
            log::warn!(
                "transaction at {} precedes window start {}, skipped",
                entry.value_timestamp,
                window_start
            );
            continue;
        };
        // A transaction stamped exactly at the reference instant shifts past
        // the reference date and opens a trailing bucket of its own.
        if offset >= buckets.len() {
            buckets.resize(offset + 1, 0.0);
        }
        buckets[offset] += amount;
    }

    // Mean of the running movement, then the opening balance on top: a
    // window whose movements net to zero returns start_balance bit for bit.
    let mut running = 0.0;
    let mut total = 0.0;
    for movement in &buckets {
        running += movement;
        total += running;
    }

    WindowAverage {
        average: total / buckets.len() as f64 + start_balance,
        bucket_count: buckets.len(),
        transaction_count: entries.len(),
    }
}
