//! Day bucketing behaviour of the window averager.

use booked_balance_core::{
    averager::{average_window, day_anchor},
    event::EvaluationEvent,
    ledger::LedgerEntry,
    timestamp::parse_timestamp,
    types::Timestamp,
    AccountRecord, BalanceConfig, BalanceEngine, BalanceQuery, Transaction,
};

fn ts(raw: &str) -> Timestamp {
    parse_timestamp(raw).expect("test timestamp")
}

fn entry(raw: &str, amount: f64) -> LedgerEntry {
    LedgerEntry { value_timestamp: ts(raw), amount }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn bucket_count_matches_anchor_to_reference_dates() {
    let _ = env_logger::builder().is_test(true).try_init();

    let references = [
        "2022-04-01 00:00:00",
        "2022-04-01 21:30:00",
        "2022-03-01 23:59:59.999",
        "2024-03-01 06:15:00",
    ];
    for raw in references {
        let reference = ts(raw);
        let engine = BalanceEngine::build(
            // One transaction two days before the reference, never on it.
            vec![Transaction::new("ac_1", reference - chrono::Duration::days(2), 1.0)],
            vec![AccountRecord::new("ac_1", ts("2020-01-01"), 0.0)],
            BalanceConfig::default_test(),
        )
        .unwrap();

        let mut trace = Vec::new();
        engine
            .evaluate_traced(&BalanceQuery::new("ac_1", reference), &mut trace)
            .unwrap();

        let window_start = engine.window_start(reference).unwrap();
        let expected = (reference.date() - day_anchor(window_start).date()).num_days() as usize + 1;
        let found = trace.iter().find_map(|e| match e {
            EvaluationEvent::WindowAveraged { bucket_count, .. } => Some(*bucket_count),
            _ => None,
        });
        assert_eq!(found, Some(expected), "reference {raw}");
        assert_eq!(expected, 90);
    }
}

#[test]
fn days_run_from_window_clock_time_not_midnight() {
    // Window opens 2022-01-01 21:30. The first bucket closes at 21:30 on
    // the 2nd, so these two credits a minute apart land in different days.
    let avg = average_window(
        0.0,
        ts("2022-01-01 21:30"),
        ts("2022-04-01 21:30"),
        &[entry("2022-01-02 21:29", 10.0), entry("2022-01-02 21:30", 10.0)],
    );

    assert_eq!(avg.bucket_count, 90);
    assert_close(avg.average, (10.0 + 89.0 * 20.0) / 90.0);
}

#[test]
fn near_midnight_transactions_follow_the_shift() {
    // Midnight window: the shift is a full day, so 23:59:59 on the 1st is
    // the first bucket and 00:00 on the 2nd already the second one.
    let avg = average_window(
        0.0,
        ts("2022-01-01"),
        ts("2022-04-01"),
        &[entry("2022-01-01 23:59:59", 9.0), entry("2022-01-02 00:00:00", 9.0)],
    );

    assert_close(avg.average, (9.0 + 89.0 * 18.0) / 90.0);
}

#[test]
fn empty_days_still_weigh_on_the_average() {
    let sparse = average_window(
        100.0,
        ts("2022-01-01"),
        ts("2022-04-01"),
        &[entry("2022-03-31 12:00", -90.0)],
    );

    assert_eq!(sparse.bucket_count, 90);
    assert_eq!(sparse.transaction_count, 1);
    // Only the last bucket (2022-04-01) carries the debit.
    assert_close(sparse.average, 100.0 - 1.0);
}

#[test]
fn transaction_on_reference_instant_opens_trailing_bucket() {
    let avg = average_window(
        0.0,
        ts("2022-01-01"),
        ts("2022-04-01"),
        &[entry("2022-04-01", 91.0)],
    );

    assert_eq!(avg.bucket_count, 91);
    assert_close(avg.average, 1.0);
}

#[test]
fn zero_width_window_keeps_one_bucket() {
    let config = BalanceConfig { window_days: 0, ..BalanceConfig::default_test() };
    let engine = BalanceEngine::build(
        vec![Transaction::new("ac_1", ts("2022-01-10 12:00"), 10.0)],
        vec![AccountRecord::new("ac_1", ts("2022-01-01"), 5.0)],
        config,
    )
    .unwrap();

    let mut trace = Vec::new();
    let row = engine
        .evaluate_traced(&BalanceQuery::new("ac_1", ts("2022-01-10 12:00")), &mut trace)
        .unwrap();

    // Forward replay folds the credit into the opening balance; the window
    // copy of it is zeroed.
    assert_eq!(row.value(), 15.0);
    assert!(trace.iter().any(|e| matches!(
        e,
        EvaluationEvent::WindowAveraged { bucket_count: 1, transaction_count: 1, .. }
    )));
}
