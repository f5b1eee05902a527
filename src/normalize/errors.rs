use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::types::TypeError;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Failed to open [{}]: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV export is missing required column [{0}]")]
    MissingColumn(String),
    #[error("CSV export [{0}] has no data rows")]
    Empty(String),
    #[error("Extraction output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error)
}

/// Why a single record was skipped. Never fatal.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("malformed record: {0}")]
    Malformed(#[from] csv::Error),
    #[error("empty account type")]
    EmptyAccountType,
    #[error("{0}")]
    AccountType(#[from] TypeError),
    #[error("empty account number")]
    EmptyAccountNumber,
    #[error("invalid date format: {0}")]
    InvalidDate(String),
    #[error("empty description")]
    EmptyDescription,
    #[error("invalid {currency} amount: {value}")]
    InvalidAmount {
        currency: &'static str,
        value: String
    },
    #[error("no amount specified")]
    MissingAmount
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction command is empty")]
    EmptyCommand,
    #[error("Failed to resolve path [{}]: {source}", path.display())]
    Path {
        path: PathBuf,
        source: io::Error
    },
    #[error("Failed to launch extraction engine [{program}]: {source}")]
    Spawn {
        program: String,
        source: io::Error
    },
    #[error("Extraction engine exited with {status}\nOutput: {output}")]
    Failed {
        status: ExitStatus,
        output: String
    },
    #[error(transparent)]
    Normalize(#[from] NormalizeError)
}
