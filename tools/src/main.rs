//! balance-runner: headless average booked balance runner.
//!
//! Usage:
//!   balance-runner --transactions t.csv --accounts a.csv --queries q.csv
//!   balance-runner --synthetic-seed 42 --synthetic-accounts 20 --format json
//!
//! Options:
//!   --config PATH     JSON config (window_days, output_precision)
//!   --format csv|json output format, default csv
//!   --trace PATH      write the evaluation trace as JSON lines

mod loader;
mod output;

use anyhow::{bail, Context, Result};
use booked_balance_core::{
    synth::{self, SynthConfig},
    AccountRecord, BalanceConfig, BalanceEngine, BalanceQuery, Transaction,
};
use output::OutputFormat;
use std::env;
use std::io::{self, BufWriter, Write};

struct Inputs {
    transactions: Vec<Transaction>,
    accounts:     Vec<AccountRecord>,
    queries:      Vec<BalanceQuery>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = match flag_value(&args, "--config") {
        Some(path) => {
            BalanceConfig::load(path).with_context(|| format!("loading config {path}"))?
        }
        None => BalanceConfig::default(),
    };
    let format: OutputFormat = flag_value(&args, "--format").unwrap_or("csv").parse()?;
    let trace_path = flag_value(&args, "--trace");

    let inputs = load_inputs(&args)?;
    eprintln!("balance-runner: average booked balance");
    eprintln!("  window:        {} days", config.window_days);
    eprintln!("  precision:     {}", config.output_precision);
    eprintln!("  transactions:  {}", inputs.transactions.len());
    eprintln!("  accounts:      {}", inputs.accounts.len());
    eprintln!("  queries:       {}", inputs.queries.len());

    let precision = config.output_precision;
    let engine = BalanceEngine::build(inputs.transactions, inputs.accounts, config)?;

    let report = match trace_path {
        Some(path) => {
            let (report, trace) = engine.run_traced(&inputs.queries)?;
            let file = std::fs::File::create(path)
                .with_context(|| format!("Cannot create {path}"))?;
            let mut writer = BufWriter::new(file);
            for event in &trace {
                writeln!(writer, "{}", event.to_json_line()?)?;
            }
            writer.flush()?;
            log::info!("wrote {} trace events to {path}", trace.len());
            report
        }
        None => engine.run(&inputs.queries)?,
    };

    let stdout = io::stdout();
    output::write_report(stdout.lock(), &report, format, precision)?;

    let summary = report.summary();
    eprintln!("=== RUN SUMMARY ===");
    eprintln!("  rows:             {}", summary.rows);
    eprintln!("  computed:         {}", summary.computed);
    eprintln!("  unknown accounts: {}", summary.unknown_accounts);
    Ok(())
}

fn load_inputs(args: &[String]) -> Result<Inputs> {
    if let Some(seed) = flag_value(args, "--synthetic-seed") {
        let seed: u64 = seed
            .parse()
            .with_context(|| format!("--synthetic-seed expects an integer, got '{seed}'"))?;
        let defaults = SynthConfig::new(seed);
        let config = SynthConfig {
            accounts: parse_arg(args, "--synthetic-accounts", defaults.accounts),
            days: parse_arg(args, "--synthetic-days", defaults.days),
            ..defaults
        };
        let ledger = synth::generate(&config)?;
        return Ok(Inputs {
            transactions: ledger.transactions,
            accounts: ledger.accounts,
            queries: ledger.queries,
        });
    }

    let (Some(txn_path), Some(acct_path), Some(query_path)) = (
        flag_value(args, "--transactions"),
        flag_value(args, "--accounts"),
        flag_value(args, "--queries"),
    ) else {
        bail!("need --transactions, --accounts and --queries (or --synthetic-seed)");
    };

    Ok(Inputs {
        transactions: loader::read_transactions(loader::open(txn_path)?)
            .with_context(|| format!("loading {txn_path}"))?,
        accounts: loader::read_accounts(loader::open(acct_path)?)
            .with_context(|| format!("loading {acct_path}"))?,
        queries: loader::read_queries(loader::open(query_path)?)
            .with_context(|| format!("loading {query_path}"))?,
    })
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
