//! Account registry: one authoritative creation record per account.

use crate::types::{AccountId, AccountRecord};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct AccountRegistry {
    records: HashMap<AccountId, AccountRecord>,
}

impl AccountRegistry {
    /// Keep the record with the latest creation timestamp per account.
    /// On an exact tie the record that appears later in the input wins.
    pub fn build(records: Vec<AccountRecord>) -> Self {
        let total = records.len();
        let mut authoritative: HashMap<AccountId, AccountRecord> = HashMap::new();

        for record in records {
            match authoritative.get(&record.account_id) {
                Some(current) if current.creation_timestamp > record.creation_timestamp => {
                    log::debug!(
                        "account {}: ignoring creation record at {} (superseded by {})",
                        record.account_id,
                        record.creation_timestamp,
                        current.creation_timestamp
                    );
                }
                _ => {
                    authoritative.insert(record.account_id.clone(), record);
                }
            }
        }

        let superseded = total - authoritative.len();
        if superseded > 0 {
            log::warn!("{superseded} account records superseded by later creation records");
        }

        Self { records: authoritative }
    }

    pub fn authoritative(&self, account_id: &str) -> Option<&AccountRecord> {
        self.records.get(account_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
