//! Opening balance reconstruction.
//!
//! The registry only knows an account's balance at its creation instant.
//! The averaging window needs the balance at `window_start`, so we replay
//! the ledger between the two instants, forward or backward.

use crate::{
    ledger::LedgerIndex,
    types::{AccountRecord, Amount, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Direction in which the ledger was replayed from the creation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replay {
    /// Created before the window: add everything up to `window_start`.
    Forward,
    /// Created inside the window: undo everything after `window_start`.
    Backward,
    /// Created exactly at `window_start`.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningBalance {
    /// Balance after every transaction stamped at or before `window_start`.
    pub balance:    Amount,
    pub replay:     Replay,
    /// Signed amount applied to `balance_at_creation` to reach `balance`.
    pub adjustment: Amount,
}

pub fn reconstruct_opening_balance(
    record: &AccountRecord,
    ledger: &LedgerIndex,
    window_start: Timestamp,
) -> OpeningBalance {
    let created = record.creation_timestamp;
    let account_id = record.account_id.as_str();

    let (replay, adjustment) = if created < window_start {
        (Replay::Forward, ledger.range_sum(account_id, created, window_start))
    } else if created > window_start {
        (Replay::Backward, -ledger.range_sum(account_id, window_start, created))
    } else {
        (Replay::Exact, 0.0)
    };

    OpeningBalance {
        balance: record.balance_at_creation + adjustment,
        replay,
        adjustment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2022, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn ledger() -> LedgerIndex {
        LedgerIndex::build(vec![
            Transaction::new("ac_1", day(1, 5), 10.0),
            Transaction::new("ac_1", day(1, 10), -20.0),
            Transaction::new("ac_1", day(1, 20), 40.0),
        ])
    }

    #[test]
    fn forward_replay_adds_movements_up_to_window_start() {
        let record = AccountRecord::new("ac_1", day(1, 1), 100.0);
        let opening = reconstruct_opening_balance(&record, &ledger(), day(1, 10));
        assert_eq!(opening.replay, Replay::Forward);
        assert_eq!(opening.balance, 90.0);
        assert_eq!(opening.adjustment, -10.0);
    }

    #[test]
    fn backward_replay_undoes_movements_after_window_start() {
        let record = AccountRecord::new("ac_1", day(1, 25), 100.0);
        let opening = reconstruct_opening_balance(&record, &ledger(), day(1, 10));
        assert_eq!(opening.replay, Replay::Backward);
        assert_eq!(opening.balance, 60.0);
    }

    #[test]
    fn exact_creation_keeps_the_recorded_balance() {
        let record = AccountRecord::new("ac_1", day(1, 10), 100.0);
        let opening = reconstruct_opening_balance(&record, &ledger(), day(1, 10));
        assert_eq!(opening.replay, Replay::Exact);
        assert_eq!(opening.balance, 100.0);
        assert_eq!(opening.adjustment, 0.0);
    }
}
