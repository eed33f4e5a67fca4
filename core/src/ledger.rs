//! Per-account transaction index.
//!
//! RULE: the index is built once per batch and never mutated afterwards.
//! Every query reads sorted slices; nothing re-sorts on the hot path.

use crate::types::{AccountId, Amount, Timestamp, Transaction};
use std::collections::HashMap;

/// One transaction as stored in an account's partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub value_timestamp: Timestamp,
    pub amount:          Amount,
}

#[derive(Debug, Default)]
pub struct LedgerIndex {
    partitions: HashMap<AccountId, Vec<LedgerEntry>>,
    transaction_count: usize,
}

impl LedgerIndex {
    /// Partition by account and sort each partition by value timestamp.
    /// The sort is stable: equal timestamps keep their input order.
    pub fn build(transactions: Vec<Transaction>) -> Self {
        let transaction_count = transactions.len();
        let mut partitions: HashMap<AccountId, Vec<LedgerEntry>> = HashMap::new();

        for txn in transactions {
            partitions.entry(txn.account_id).or_default().push(LedgerEntry {
                value_timestamp: txn.value_timestamp,
                amount:          txn.amount,
            });
        }
        for entries in partitions.values_mut() {
            entries.sort_by_key(|e| e.value_timestamp);
        }

        log::info!(
            "ledger index built: {} transactions across {} accounts",
            transaction_count,
            partitions.len()
        );

        Self { partitions, transaction_count }
    }

    /// All entries for an account, ascending. Empty for unseen accounts.
    pub fn entries(&self, account_id: &str) -> &[LedgerEntry] {
        self.partitions
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entries with `start_inclusive <= ts <= end_inclusive`.
    pub fn window(
        &self,
        account_id: &str,
        start_inclusive: Timestamp,
        end_inclusive: Timestamp,
    ) -> &[LedgerEntry] {
        let entries = self.entries(account_id);
        let lo = entries.partition_point(|e| e.value_timestamp < start_inclusive);
        let hi = entries.partition_point(|e| e.value_timestamp <= end_inclusive);
        if lo >= hi {
            return &[];
        }
        &entries[lo..hi]
    }

    /// Sum of amounts with `start_exclusive < ts <= end_inclusive`.
    pub fn range_sum(
        &self,
        account_id: &str,
        start_exclusive: Timestamp,
        end_inclusive: Timestamp,
    ) -> Amount {
        let entries = self.entries(account_id);
        let lo = entries.partition_point(|e| e.value_timestamp <= start_exclusive);
        let hi = entries.partition_point(|e| e.value_timestamp <= end_inclusive);
        if lo >= hi {
            return 0.0;
        }
        entries[lo..hi].iter().map(|e| e.amount).sum()
    }

    pub fn account_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2022, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn index() -> LedgerIndex {
        LedgerIndex::build(vec![
            Transaction::new("ac_1", day(5), 5.0),
            Transaction::new("ac_1", day(1), 1.0),
            Transaction::new("ac_2", day(2), 100.0),
            Transaction::new("ac_1", day(3), 3.0),
            Transaction::new("ac_1", day(3), 30.0),
        ])
    }

    #[test]
    fn partitions_are_sorted_and_stable_on_ties() {
        let idx = index();
        let amounts: Vec<f64> = idx.entries("ac_1").iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![1.0, 3.0, 30.0, 5.0]);
        assert_eq!(idx.account_count(), 2);
        assert_eq!(idx.transaction_count(), 5);
    }

    #[test]
    fn range_sum_excludes_start_and_includes_end() {
        let idx = index();
        assert_eq!(idx.range_sum("ac_1", day(1), day(3)), 33.0);
        assert_eq!(idx.range_sum("ac_1", day(1), day(5)), 38.0);
        assert_eq!(idx.range_sum("ac_1", day(3), day(5)), 5.0);
        assert_eq!(idx.range_sum("ac_1", day(5), day(1)), 0.0);
        assert_eq!(idx.range_sum("ac_unknown", day(1), day(31)), 0.0);
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let idx = index();
        let w = idx.window("ac_1", day(1), day(3));
        assert_eq!(w.len(), 3);
        assert_eq!(w[0].amount, 1.0);
        assert!(idx.window("ac_1", day(6), day(9)).is_empty());
        assert!(idx.window("ac_1", day(4), day(2)).is_empty());
    }
}
