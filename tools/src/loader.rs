//! CSV loading for the three input datasets.
//!
//! Everything is validated here: the core only ever sees typed records.
//! Column lookup is by header name; extra columns are ignored.

use anyhow::{anyhow, Context, Result};
use booked_balance_core::{
    timestamp::parse_timestamp, AccountRecord, BalanceQuery, Transaction,
};
use std::io::Read;

struct Columns {
    headers: Vec<String>,
    dataset: &'static str,
}

impl Columns {
    fn index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow!("{}: missing column '{name}'", self.dataset))
    }
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn columns<R: Read>(reader: &mut csv::Reader<R>, dataset: &'static str) -> Result<Columns> {
    let headers = reader
        .headers()
        .with_context(|| format!("{dataset}: cannot read header row"))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    Ok(Columns { headers, dataset })
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("")
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_amount(raw: &str, dataset: &str, line: u64) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| anyhow!("{dataset} line {line}: unparseable amount '{raw}'"))
}

fn parse_instant(raw: &str, dataset: &str, line: u64) -> Result<chrono::NaiveDateTime> {
    parse_timestamp(raw).with_context(|| format!("{dataset} line {line}"))
}

pub fn read_transactions<R: Read>(input: R) -> Result<Vec<Transaction>> {
    let mut rdr = reader(input);
    let cols = columns(&mut rdr, "transactions")?;
    let account_idx = cols.index("account_id")?;
    let ts_idx = cols.index("value_timestamp")?;
    let amount_idx = cols.index("amount")?;

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record.context("transactions: malformed row")?;
        let line = line_of(&record);
        out.push(Transaction::new(
            field(&record, account_idx),
            parse_instant(field(&record, ts_idx), "transactions", line)?,
            parse_amount(field(&record, amount_idx), "transactions", line)?,
        ));
    }
    Ok(out)
}

pub fn read_accounts<R: Read>(input: R) -> Result<Vec<AccountRecord>> {
    let mut rdr = reader(input);
    let cols = columns(&mut rdr, "accounts")?;
    let account_idx = cols.index("account_id")?;
    let ts_idx = cols.index("creation_timestamp")?;
    let balance_idx = cols.index("balance_at_creation")?;

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record.context("accounts: malformed row")?;
        let line = line_of(&record);
        out.push(AccountRecord::new(
            field(&record, account_idx),
            parse_instant(field(&record, ts_idx), "accounts", line)?,
            parse_amount(field(&record, balance_idx), "accounts", line)?,
        ));
    }
    Ok(out)
}

pub fn read_queries<R: Read>(input: R) -> Result<Vec<BalanceQuery>> {
    let mut rdr = reader(input);
    let cols = columns(&mut rdr, "reference_timestamps")?;
    let account_idx = cols.index("account_id")?;
    let ts_idx = cols.index("reference_timestamp")?;

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record.context("reference_timestamps: malformed row")?;
        let line = line_of(&record);
        out.push(BalanceQuery::new(
            field(&record, account_idx),
            parse_instant(field(&record, ts_idx), "reference_timestamps", line)?,
        ));
    }
    Ok(out)
}

pub fn open(path: &str) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("Cannot open {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_transactions_with_extra_columns_in_any_order() {
        let csv = "amount,note,value_timestamp,account_id\n\
                   12.5,coffee,2022-01-03 08:00:00,ac_1\n\
                   -3,,2022-01-04,ac_2\n";
        let txns = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].account_id, "ac_1");
        assert_eq!(txns[0].amount, 12.5);
        assert_eq!(txns[1].amount, -3.0);
        assert_eq!(txns[1].value_timestamp, parse_timestamp("2022-01-04").unwrap());
    }

    #[test]
    fn reads_accounts_and_queries() {
        let accounts = read_accounts(
            "account_id,creation_timestamp,balance_at_creation\nac_1,2022-01-01,100\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(accounts[0].balance_at_creation, 100.0);

        let queries = read_queries(
            "account_id,reference_timestamp\nac_1,2022-01-12 23:59:59.999\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(
            queries[0].reference_timestamp,
            parse_timestamp("2022-01-12 23:59:59.999").unwrap()
        );
    }

    #[test]
    fn missing_column_is_named() {
        let err = read_queries("account_id,when\nac_1,2022-01-01\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("reference_timestamp"), "unexpected: {err}");
    }

    #[test]
    fn malformed_values_fail_fast_with_line_numbers() {
        let bad_ts = "account_id,value_timestamp,amount\nac_1,2022-01-01,1\nac_1,not-a-date,2\n";
        let err = read_transactions(bad_ts.as_bytes()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("line 3"), "unexpected: {chain}");
        assert!(chain.contains("not-a-date"), "unexpected: {chain}");

        let bad_amount = "account_id,value_timestamp,amount\nac_1,2022-01-01,ten\n";
        let err = read_transactions(bad_amount.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'ten'"), "unexpected: {err}");
    }
}
