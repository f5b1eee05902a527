use super::upload;

use std::cell::RefCell;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{BatchOutcome, LedgerError, LedgerService};
use crate::models::{NewAccount, SourceAccount, TargetAccount, Transaction};
use crate::types::SourceAccountType;

/// Records batch sizes and fails the batches whose index is listed.
struct RecordingLedger {
    batches: RefCell<Vec<usize>>,
    failing_batches: Vec<usize>
}

impl LedgerService for RecordingLedger {
    async fn list_accounts(&self) -> Result<Vec<TargetAccount>, LedgerError> {
        Ok(Vec::new())
    }

    async fn create_account(&self, _account: &NewAccount) -> Result<TargetAccount, LedgerError> {
        Err(LedgerError::Http { status: 501, body: "not supported".to_string() })
    }

    async fn create_transactions(&self, transactions: &[Transaction]) -> BatchOutcome {
        let index = self.batches.borrow().len();
        self.batches.borrow_mut().push(transactions.len());

        if self.failing_batches.contains(&index) {
            return BatchOutcome {
                created: 0,
                errors: vec![LedgerError::Http { status: 500, body: "boom".to_string() }]
            };
        }

        BatchOutcome { created: transactions.len() as u64, errors: Vec::new() }
    }
}

fn create_transactions(count: usize) -> Result<Vec<Transaction>> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("invalid test date"))?;

    (0..count).map(|index| -> Result<Transaction> {
        let account = SourceAccount { number: Some("1234".to_string()), account_type: SourceAccountType::Savings, name: None };
        let mut transaction = Transaction::new(date, Decimal::from_str("1.00")?, "CAD", format!("deposit {index}"), account, "test")
            .ok_or_else(|| anyhow!("transaction was dropped"))?;
        transaction.assign_account(1)?;
        Ok(transaction)
    }).collect()
}

#[tokio::test]
async fn test_upload_splits_into_batches() -> Result<()> {
    let ledger = RecordingLedger { batches: RefCell::new(Vec::new()), failing_batches: Vec::new() };
    let transactions = create_transactions(5)?;

    let summary = upload(&ledger, &transactions, 2).await;

    assert_eq!(*ledger.batches.borrow(), vec![2, 2, 1]);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.created, 5);
    assert_eq!(summary.failed, 0);

    Ok(())
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_later_batches() -> Result<()> {
    let ledger = RecordingLedger { batches: RefCell::new(Vec::new()), failing_batches: vec![0] };
    let transactions = create_transactions(3)?;

    let summary = upload(&ledger, &transactions, 2).await;

    assert_eq!(summary.batches, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_upload_sends_nothing() -> Result<()> {
    let ledger = RecordingLedger { batches: RefCell::new(Vec::new()), failing_batches: Vec::new() };

    let summary = upload(&ledger, &[], 1000).await;

    assert!(ledger.batches.borrow().is_empty());
    assert_eq!(summary, Default::default());

    Ok(())
}
