//! The query orchestrator.
//!
//! EVALUATION ORDER (per query, no state shared between queries):
//!   1. Resolve the authoritative account record.   (registry)
//!   2. Reconstruct the balance at window start.    (reconstructor)
//!   3. Average end-of-day balances over the window. (averager)
//!
//! RULES:
//!   - The index and registry are built once and never mutated.
//!   - An unknown account short-circuits before steps 2 and 3, and before
//!     any window arithmetic on its reference timestamp.
//!   - Rows come back in query order; duplicate queries yield duplicate rows.

use crate::{
    averager::{average_window, day_anchor},
    config::BalanceConfig,
    error::{BalanceError, BalanceResult},
    event::EvaluationEvent,
    ledger::LedgerIndex,
    reconstructor::reconstruct_opening_balance,
    registry::AccountRegistry,
    report::{BalanceOutcome, BalanceReport, BalanceRow},
    timestamp::canonical_string,
    types::{AccountRecord, BalanceQuery, Timestamp, Transaction},
};
use chrono::Duration;

pub struct BalanceEngine {
    pub config: BalanceConfig,
    ledger:     LedgerIndex,
    registry:   AccountRegistry,
}

impl BalanceEngine {
    /// Validate the config and build the ledger index and account registry.
    pub fn build(
        transactions: Vec<Transaction>,
        accounts: Vec<AccountRecord>,
        config: BalanceConfig,
    ) -> BalanceResult<Self> {
        config.validate()?;
        let ledger = LedgerIndex::build(transactions);
        let registry = AccountRegistry::build(accounts);
        log::info!(
            "balance engine ready: {} known accounts, {}-day window",
            registry.len(),
            config.window_days
        );
        Ok(Self { config, ledger, registry })
    }

    pub fn ledger(&self) -> &LedgerIndex {
        &self.ledger
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Left edge of the averaging window for a reference instant.
    pub fn window_start(&self, reference: Timestamp) -> BalanceResult<Timestamp> {
        let days = self.config.window_days;
        reference
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| BalanceError::TimestampOutOfRange {
                timestamp: canonical_string(&reference),
                days,
            })
    }

    pub fn evaluate(&self, query: &BalanceQuery) -> BalanceResult<BalanceRow> {
        let mut discarded = Vec::new();
        self.evaluate_traced(query, &mut discarded)
    }

    /// Evaluate one query, appending what was done to `trace`.
    pub fn evaluate_traced(
        &self,
        query: &BalanceQuery,
        trace: &mut Vec<EvaluationEvent>,
    ) -> BalanceResult<BalanceRow> {
        let reference = query.reference_timestamp;
        let account_id = query.account_id.as_str();

        let outcome = match self.registry.authoritative(account_id) {
            None => {
                log::debug!("account {account_id}: no creation record, reporting unknown");
                trace.push(EvaluationEvent::UnknownAccount {
                    account_id: query.account_id.clone(),
                    reference_timestamp: reference,
                });
                BalanceOutcome::UnknownAccount
            }
            Some(record) => {
                let window_start = self.window_start(reference)?;
                let opening = reconstruct_opening_balance(record, &self.ledger, window_start);
                trace.push(EvaluationEvent::OpeningBalanceReconstructed {
                    account_id: query.account_id.clone(),
                    window_start,
                    creation_timestamp: record.creation_timestamp,
                    replay: opening.replay,
                    adjustment: opening.adjustment,
                    start_balance: opening.balance,
                });

                let entries = self.ledger.window(account_id, window_start, reference);
                let window = average_window(opening.balance, window_start, reference, entries);

                if window.transaction_count == 0 {
                    trace.push(EvaluationEvent::EmptyWindow {
                        account_id: query.account_id.clone(),
                        reference_timestamp: reference,
                        start_balance: opening.balance,
                    });
                } else {
                    trace.push(EvaluationEvent::WindowAveraged {
                        account_id: query.account_id.clone(),
                        reference_timestamp: reference,
                        day_anchor: day_anchor(window_start),
                        bucket_count: window.bucket_count,
                        transaction_count: window.transaction_count,
                        average: window.average,
                    });
                }

                log::debug!(
                    "account {account_id} @ {reference}: start {:.7} ({:?}), {} txns, {} buckets, average {:.7}",
                    opening.balance,
                    opening.replay,
                    window.transaction_count,
                    window.bucket_count,
                    window.average
                );
                BalanceOutcome::Computed(window.average)
            }
        };

        Ok(BalanceRow {
            reference_key: canonical_string(&reference),
            reference_timestamp: reference,
            account_id: query.account_id.clone(),
            outcome,
        })
    }

    /// Evaluate every query. Fails on the first precondition violation;
    /// no partial report is returned.
    pub fn run(&self, queries: &[BalanceQuery]) -> BalanceResult<BalanceReport> {
        let rows = queries
            .iter()
            .map(|q| self.evaluate(q))
            .collect::<BalanceResult<Vec<_>>>()?;
        let report = BalanceReport::new(rows);

        let summary = report.summary();
        log::info!(
            "evaluated {} queries: {} computed, {} unknown accounts",
            summary.rows,
            summary.computed,
            summary.unknown_accounts
        );
        Ok(report)
    }

    /// Like `run`, also returning the full evaluation trace.
    pub fn run_traced(
        &self,
        queries: &[BalanceQuery],
    ) -> BalanceResult<(BalanceReport, Vec<EvaluationEvent>)> {
        let mut trace = Vec::new();
        let rows = queries
            .iter()
            .map(|q| self.evaluate_traced(q, &mut trace))
            .collect::<BalanceResult<Vec<_>>>()?;
        Ok((BalanceReport::new(rows), trace))
    }
}

/// Build an engine with the default config and evaluate every query.
pub fn average_booked_balance_from(
    transactions: Vec<Transaction>,
    accounts: Vec<AccountRecord>,
    queries: &[BalanceQuery],
) -> BalanceResult<BalanceReport> {
    BalanceEngine::build(transactions, accounts, BalanceConfig::default())?.run(queries)
}
