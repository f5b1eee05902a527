use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{SourceAccount, Transaction};
use crate::normalize::{NormalizeError, RowError};
use crate::types::SourceAccountType;

const REQUIRED_COLUMNS: [&str; 6] = ["Account Type", "Account Number", "Transaction Date", "Description 1", "CAD$", "USD$"];
const DATE_FORMAT: &str = "%m/%d/%Y";

/// A row of the bank's CSV export.
///
/// `Cheque Number` is part of the export but carries nothing the ledger needs.
#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "Account Type", default)]
    account_type: Option<String>,
    #[serde(rename = "Account Number", default)]
    account_number: Option<String>,
    #[serde(rename = "Transaction Date", default)]
    date: Option<String>,
    #[serde(rename = "Description 1", default)]
    description_1: Option<String>,
    #[serde(rename = "Description 2", default)]
    description_2: Option<String>,
    #[serde(rename = "CAD$", default)]
    cad: Option<String>,
    #[serde(rename = "USD$", default)]
    usd: Option<String>
}

pub fn read_export_file(path: &Path) -> Result<Vec<Transaction>, NormalizeError> {
    let file = File::open(path).map_err(|source| NormalizeError::Io { path: path.to_path_buf(), source })?;

    read_export(BufReader::new(file), &path.to_string_lossy())
}

/// Reads a CSV export into canonical transactions.
///
/// Missing required columns or an export without data rows fail the whole
/// file. Individual bad rows are skipped with a warning, zero-amount rows are
/// dropped silently.
pub fn read_export<R: Read>(reader: R, source_path: &str) -> Result<Vec<Transaction>, NormalizeError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    check_columns(&headers)?;

    let mut transactions = Vec::new();
    let mut rows = 0usize;

    for (index, result) in reader.records().enumerate() {
        rows += 1;
        let line = index + 2;

        let parsed = result
            .map_err(RowError::from)
            .and_then(|record| record.deserialize::<ExportRow>(Some(&headers)).map_err(RowError::from))
            .and_then(|row| parse_row(row, source_path));

        match parsed {
            Ok(Some(transaction)) => transactions.push(transaction),
            Ok(None) => debug!("Dropping zero-amount row {line}"),
            Err(error) => warn!("Skipping row {line}: {error}")
        }
    }

    if rows == 0 {
        return Err(NormalizeError::Empty(source_path.to_string()));
    }

    Ok(transactions)
}

fn check_columns(headers: &StringRecord) -> Result<(), NormalizeError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(NormalizeError::MissingColumn(column.to_string()));
        }
    }

    Ok(())
}

fn parse_row(row: ExportRow, source_path: &str) -> Result<Option<Transaction>, RowError> {
    let account_type = non_empty(row.account_type).ok_or(RowError::EmptyAccountType)?;
    let account_type = SourceAccountType::from_str(&account_type)?;
    let account_number = non_empty(row.account_number).ok_or(RowError::EmptyAccountNumber)?;

    let date = row.date.unwrap_or_default();
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|_| RowError::InvalidDate(date.clone()))?
        .and_time(NaiveTime::MIN);

    let description = format!(
        "{} {}",
        row.description_1.unwrap_or_default().trim(),
        row.description_2.unwrap_or_default().trim()
    ).trim().to_string();

    if description.is_empty() {
        return Err(RowError::EmptyDescription);
    }

    let (amount, currency) = match (non_empty(row.cad), non_empty(row.usd)) {
        (Some(cad), _) => (parse_amount(&cad, "CAD")?, "CAD"),
        (None, Some(usd)) => (parse_amount(&usd, "USD")?, "USD"),
        (None, None) => return Err(RowError::MissingAmount)
    };

    let account = SourceAccount {
        number: Some(account_number),
        account_type,
        name: None
    };

    Ok(Transaction::new(date, amount, currency, description, account, source_path))
}

fn parse_amount(value: &str, currency: &'static str) -> Result<Decimal, RowError> {
    Decimal::from_str(&value.replace(',', ""))
        .map_err(|_| RowError::InvalidAmount { currency, value: value.to_string() })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
