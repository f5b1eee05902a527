#[cfg(test)]
mod tests;

use tracing::{error, info};

use crate::ledger::LedgerService;
use crate::models::Transaction;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub created: u64,
    pub failed: usize,
    pub batches: usize
}

/// Submits resolved transactions in sequential batches.
///
/// A failed batch is logged and counted, the remaining batches still go out.
pub async fn upload<L: LedgerService>(ledger: &L, transactions: &[Transaction], batch_size: usize) -> UploadSummary {
    let mut summary = UploadSummary::default();
    let mut submitted = 0;

    for batch in transactions.chunks(batch_size.max(1)) {
        let outcome = ledger.create_transactions(batch).await;

        summary.batches += 1;
        summary.created += outcome.created;
        summary.failed += outcome.errors.len();

        for batch_error in &outcome.errors {
            error!("{batch_error}");
        }

        submitted += batch.len();
        info!("{submitted}/{}", transactions.len());
    }

    summary
}
