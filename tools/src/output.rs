//! Result writers. Precision is applied here and nowhere else.

use anyhow::{bail, Result};
use booked_balance_core::{report::format_amount, BalanceReport};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format '{other}' (expected csv or json)"),
        }
    }
}

#[derive(serde::Serialize)]
struct JsonRow<'a> {
    reference_timestamp:    &'a str,
    account_id:             &'a str,
    average_booked_balance: String,
    unknown_account:        bool,
}

pub fn write_report<W: Write>(
    out: W,
    report: &BalanceReport,
    format: OutputFormat,
    precision: usize,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, report, precision),
        OutputFormat::Json => write_json_lines(out, report, precision),
    }
}

fn write_csv<W: Write>(out: W, report: &BalanceReport, precision: usize) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(["reference_timestamp", "account_id", "average_booked_balance"])?;
    for row in report.rows() {
        writer.write_record([
            row.reference_key.as_str(),
            row.account_id.as_str(),
            format_amount(row.value(), precision).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json_lines<W: Write>(mut out: W, report: &BalanceReport, precision: usize) -> Result<()> {
    for row in report.rows() {
        let json = JsonRow {
            reference_timestamp:    &row.reference_key,
            account_id:             &row.account_id,
            average_booked_balance: format_amount(row.value(), precision),
            unknown_account:        row.outcome.is_unknown_account(),
        };
        writeln!(out, "{}", serde_json::to_string(&json)?)?;
    }
    out.flush()?;
    Ok(())
}
