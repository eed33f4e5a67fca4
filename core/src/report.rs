//! Result table handed back to callers.

use crate::types::{AccountId, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Outcome of one query. Unknown accounts stay distinguishable from a
/// genuine zero balance until a caller asks for the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BalanceOutcome {
    Computed(Amount),
    UnknownAccount,
}

impl BalanceOutcome {
    /// Numeric value; unknown accounts read as `0`.
    pub fn value(&self) -> Amount {
        match self {
            Self::Computed(v) => *v,
            Self::UnknownAccount => 0.0,
        }
    }

    pub fn is_unknown_account(&self) -> bool {
        matches!(self, Self::UnknownAccount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Canonical string form of `reference_timestamp`; half of the row key.
    pub reference_key:       String,
    pub reference_timestamp: Timestamp,
    pub account_id:          AccountId,
    pub outcome:             BalanceOutcome,
}

impl BalanceRow {
    pub fn key(&self) -> (&str, &str) {
        (&self.reference_key, &self.account_id)
    }

    pub fn value(&self) -> Amount {
        self.outcome.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub rows:             usize,
    pub computed:         usize,
    pub unknown_accounts: usize,
}

/// Rows in query order. Keys are not unique: a repeated query yields a
/// repeated row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceReport {
    rows: Vec<BalanceRow>,
}

impl BalanceReport {
    pub fn new(rows: Vec<BalanceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BalanceRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<BalanceRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row with the given key.
    pub fn get(&self, reference_key: &str, account_id: &str) -> Option<&BalanceRow> {
        self.rows
            .iter()
            .find(|r| r.reference_key == reference_key && r.account_id == account_id)
    }

    pub fn summary(&self) -> ReportSummary {
        let unknown_accounts = self
            .rows
            .iter()
            .filter(|r| r.outcome.is_unknown_account())
            .count();
        ReportSummary {
            rows: self.rows.len(),
            computed: self.rows.len() - unknown_accounts,
            unknown_accounts,
        }
    }
}

/// Fixed-point rendering used at the output boundary.
pub fn format_amount(value: Amount, precision: usize) -> String {
    let rendered = format!("{value:.precision$}");
    // "-0.0000000" reads as a debit; print it as zero.
    if rendered.starts_with('-') && rendered[1..].chars().all(|c| c == '0' || c == '.') {
        return rendered[1..].to_string();
    }
    rendered
}
