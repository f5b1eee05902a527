use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Ledger returned HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String
    },
    #[error("Transaction [{description}] on {date} has no resolved account")]
    Unresolved {
        description: String,
        date: String
    }
}
