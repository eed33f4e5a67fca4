//! Synthetic ledger generation for demos and property tests.
//!
//! Shapes roughly follow a retail checking book: biweekly payroll credits,
//! a handful of Pareto-sized debits per day at random clock times, and the
//! occasional account that was registered twice.

use crate::{
    error::{BalanceError, BalanceResult},
    rng::{LedgerRng, RngStream},
    types::{AccountRecord, BalanceQuery, Timestamp, Transaction},
};
use chrono::{Duration, NaiveDate};

/// Account id used for the one query that never resolves.
pub const UNKNOWN_ACCOUNT_ID: &str = "ac_unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub seed:     u64,
    pub accounts: usize,
    /// Length of the generated history, in days from `start`.
    pub days:     u32,
    pub start:    Timestamp,
}

impl SynthConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            accounts: 20,
            days: 365,
            start: NaiveDate::from_ymd_opt(2022, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticLedger {
    pub transactions: Vec<Transaction>,
    pub accounts:     Vec<AccountRecord>,
    pub queries:      Vec<BalanceQuery>,
}

fn cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn at_second(start: Timestamp, day: u64, second_of_day: u64) -> Timestamp {
    start + Duration::days(day as i64) + Duration::seconds(second_of_day as i64)
}

pub fn generate(config: &SynthConfig) -> BalanceResult<SyntheticLedger> {
    if config.days == 0 {
        return Err(BalanceError::InvalidConfig {
            reason: "synthetic history needs at least one day".into(),
        });
    }
    let days = u64::from(config.days);

    let mut acct_rng = LedgerRng::for_stream(config.seed, RngStream::Accounts);
    let mut txn_rng = LedgerRng::for_stream(config.seed, RngStream::Transactions);
    let mut query_rng = LedgerRng::for_stream(config.seed, RngStream::Queries);

    let mut accounts = Vec::with_capacity(config.accounts);
    let mut transactions = Vec::new();
    let mut queries = Vec::new();

    for n in 0..config.accounts {
        let account_id = format!("ac_{n}");

        let created_day = acct_rng.next_u64_below(days);
        let creation = at_second(config.start, created_day, acct_rng.next_u64_below(86_400));
        let balance = cents(acct_rng.pareto(100.0, 1.5).min(50_000.0));

        // Re-registered accounts: a stale earlier record that must lose.
        if created_day > 0 && acct_rng.chance(0.10) {
            let stale_day = acct_rng.next_u64_below(created_day);
            accounts.push(AccountRecord::new(
                account_id.clone(),
                at_second(config.start, stale_day, 0),
                cents(acct_rng.pareto(50.0, 1.5)),
            ));
        }
        accounts.push(AccountRecord::new(account_id.clone(), creation, balance));

        let has_payroll = txn_rng.chance(0.6);
        let payroll = cents(1_500.0 + txn_rng.next_f64() * 2_000.0);

        for day in 0..days {
            if has_payroll && day % 14 == 0 {
                transactions.push(Transaction::new(
                    account_id.clone(),
                    at_second(config.start, day, 9 * 3_600),
                    payroll,
                ));
            }
            let debit_count = txn_rng.next_u64_below(3);
            for _ in 0..debit_count {
                let amount = cents(txn_rng.pareto(10.0, 1.4).min(2_000.0));
                transactions.push(Transaction::new(
                    account_id.clone(),
                    at_second(config.start, day, txn_rng.next_u64_below(86_400)),
                    -amount,
                ));
            }
        }

        let query_count = 1 + query_rng.next_u64_below(2);
        for _ in 0..query_count {
            let day = query_rng.next_u64_below(days);
            let reference = at_second(config.start, day, 86_399) + Duration::milliseconds(999);
            queries.push(BalanceQuery::new(account_id.clone(), reference));
        }
    }

    queries.push(BalanceQuery::new(
        UNKNOWN_ACCOUNT_ID,
        at_second(config.start, days - 1, 86_399),
    ));

    log::info!(
        "synthetic ledger (seed {}): {} accounts, {} records, {} transactions, {} queries",
        config.seed,
        config.accounts,
        accounts.len(),
        transactions.len(),
        queries.len()
    );

    Ok(SyntheticLedger { transactions, accounts, queries })
}
