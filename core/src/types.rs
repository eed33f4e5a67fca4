//! Shared primitive types used across the balance pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stable account identifier, as it appears in the source ledger.
pub type AccountId = String;

/// A timezone-naive instant. All inputs share one implicit clock.
pub type Timestamp = NaiveDateTime;

/// A signed monetary amount in the ledger's currency.
pub type Amount = f64;

/// One booked movement on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub account_id:      AccountId,
    pub value_timestamp: Timestamp,
    pub amount:          Amount,
}

/// The balance of an account at the moment it entered our systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id:          AccountId,
    pub creation_timestamp:  Timestamp,
    pub balance_at_creation: Amount,
}

/// A request to evaluate one account at one reference instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub account_id:          AccountId,
    pub reference_timestamp: Timestamp,
}

impl Transaction {
    pub fn new(account_id: impl Into<AccountId>, value_timestamp: Timestamp, amount: Amount) -> Self {
        Self { account_id: account_id.into(), value_timestamp, amount }
    }
}

impl AccountRecord {
    pub fn new(
        account_id: impl Into<AccountId>,
        creation_timestamp: Timestamp,
        balance_at_creation: Amount,
    ) -> Self {
        Self { account_id: account_id.into(), creation_timestamp, balance_at_creation }
    }
}

impl BalanceQuery {
    pub fn new(account_id: impl Into<AccountId>, reference_timestamp: Timestamp) -> Self {
        Self { account_id: account_id.into(), reference_timestamp }
    }
}
