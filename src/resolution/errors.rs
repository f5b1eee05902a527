use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::models::ModelError;
use crate::types::AccountId;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Account decision for [{key}] failed: {source}")]
    Decision {
        key: String,
        source: DecisionError
    },
    #[error("Selected account [{account_id}] for [{key}] is not a known ledger account")]
    UnknownSelection {
        key: String,
        account_id: AccountId
    },
    #[error("Failed to create ledger account for [{key}]: {source}")]
    Ledger {
        key: String,
        source: LedgerError
    },
    #[error("No ledger account resolved for [{key}]: {reason}")]
    Inconsistent {
        key: String,
        reason: String
    },
    #[error(transparent)]
    Model(#[from] ModelError)
}

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Input closed before an account was chosen")]
    Closed,
    #[error("Prompt I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("No scripted answer for [{0}]")]
    Unscripted(String),
    #[error("Failed to read answers from [{}]: {source}", path.display())]
    Answers {
        path: PathBuf,
        source: io::Error
    },
    #[error("Invalid answer on line {line}: {text}")]
    InvalidAnswer {
        line: usize,
        text: String
    }
}
