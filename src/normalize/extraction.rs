use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{SourceAccount, Transaction};
use crate::normalize::{DEFAULT_CURRENCY, NormalizeError};
use crate::types::SourceAccountType;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Top-level JSON document printed by the statement extraction engine.
#[derive(Debug, Deserialize)]
struct ExtractionOutput {
    #[serde(default)]
    transactions: Vec<ExtractedTransaction>,
    #[serde(default)]
    file_results: Vec<FileResult>,
    #[serde(default)]
    summary: ExtractionSummary
}

#[derive(Debug, Deserialize)]
struct ExtractedTransaction {
    date: String,
    amount: serde_json::Number,
    #[serde(default)]
    description: String,
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    account_type: String,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    source_file: String
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileResult {
    pub file: String,
    #[serde(default)]
    pub transaction_count: usize,
    #[serde(default)]
    pub processed: bool
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractionSummary {
    #[serde(default)]
    pub total_files: usize,
    #[serde(default)]
    pub processed_files: usize,
    #[serde(default)]
    pub total_transactions: usize
}

/// Per-file bookkeeping reported by the extraction engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub files: Vec<FileResult>,
    pub summary: ExtractionSummary
}

/// Converts the extraction engine's JSON into canonical transactions.
///
/// Statements carry no currency, so every record gets the default one.
/// Records with an unreadable date, amount or account type are skipped.
pub fn parse_extraction_output(json: &str) -> Result<(ExtractionReport, Vec<Transaction>), NormalizeError> {
    let output: ExtractionOutput = serde_json::from_str(json)?;
    let mut transactions = Vec::with_capacity(output.transactions.len());

    for (index, extracted) in output.transactions.into_iter().enumerate() {
        match normalize(extracted) {
            Ok(Some(transaction)) => transactions.push(transaction),
            Ok(None) => debug!("Dropping zero-amount extracted transaction {index}"),
            Err(reason) => warn!("Skipping extracted transaction {index}: {reason}")
        }
    }

    let report = ExtractionReport {
        files: output.file_results,
        summary: output.summary
    };

    Ok((report, transactions))
}

fn normalize(extracted: ExtractedTransaction) -> Result<Option<Transaction>, String> {
    let date = parse_date(&extracted.date)
        .ok_or_else(|| format!("invalid date {}", extracted.date))?;

    let amount = parse_amount(&extracted.amount)
        .ok_or_else(|| format!("invalid amount {}", extracted.amount))?;

    let account_type = SourceAccountType::from_str(&extracted.account_type)
        .map_err(|error| error.to_string())?;

    let account = SourceAccount {
        number: extracted.account_number.filter(|number| !number.trim().is_empty()),
        account_type,
        name: extracted.account_name.filter(|name| !name.trim().is_empty())
    };

    Ok(Transaction::new(date, amount, DEFAULT_CURRENCY, extracted.description, account, extracted.source_file))
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).ok()
        .or_else(|| NaiveDate::parse_from_str(value, DATE_FORMAT).ok().map(|date| date.and_time(NaiveTime::MIN)))
}

fn parse_amount(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
}
