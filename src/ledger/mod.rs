mod errors;
mod http_client;

use crate::models::{NewAccount, TargetAccount, Transaction};

pub use errors::LedgerError;
pub use http_client::HttpLedgerClient;

/// Result of submitting one batch of transactions.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub created: u64,
    pub errors: Vec<LedgerError>
}

/// The remote ledger the reconciled transactions are ingested into.
pub trait LedgerService {
    async fn list_accounts(&self) -> Result<Vec<TargetAccount>, LedgerError>;
    async fn create_account(&self, account: &NewAccount) -> Result<TargetAccount, LedgerError>;
    /// Submits one batch. Every transaction must already carry a resolved account.
    async fn create_transactions(&self, transactions: &[Transaction]) -> BatchOutcome;
}
