use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::models::errors::ModelError;
use crate::types::{AccountId, AccountKey, Direction, SourceAccountType};

/// Account details a source reports alongside each transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAccount {
    pub number: Option<String>,
    pub account_type: SourceAccountType,
    pub name: Option<String>
}

/// The canonical transaction every source is normalized into.
///
/// `amount` is always positive; the sign lives in `direction`. The ledger
/// account is unset until resolution assigns it and cannot change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub direction: Direction,
    pub currency: String,
    pub description: String,
    pub source_account_number: Option<String>,
    pub source_account_type: SourceAccountType,
    pub source_account_name: Option<String>,
    /// Which input file produced the record.
    pub source_path: String,
    resolved_account_id: Option<AccountId>
}

impl Transaction {
    /// Builds a transaction from a signed source amount.
    ///
    /// Returns `None` for a zero amount, which carries no position change.
    pub fn new(
        date: NaiveDateTime,
        signed_amount: Decimal,
        currency: impl Into<String>,
        description: impl Into<String>,
        account: SourceAccount,
        source_path: impl Into<String>
    ) -> Option<Self> {
        if signed_amount.is_zero() {
            return None
        }

        let direction = if signed_amount.is_sign_negative() {
            Direction::Outgoing
        } else {
            Direction::Incoming
        };

        Some(Self {
            date,
            amount: signed_amount.abs(),
            direction,
            currency: currency.into(),
            description: description.into(),
            source_account_number: account.number,
            source_account_type: account.account_type,
            source_account_name: account.name,
            source_path: source_path.into(),
            resolved_account_id: None
        })
    }

    pub fn account_key(&self) -> AccountKey {
        AccountKey::new(self.source_account_number.as_deref(), self.source_account_type)
    }

    pub fn resolved_account_id(&self) -> Option<AccountId> {
        self.resolved_account_id
    }

    /// Assigns the ledger account. Assigning the same account again is a no-op.
    pub fn assign_account(&mut self, account_id: AccountId) -> Result<(), ModelError> {
        match self.resolved_account_id {
            Some(current) if current != account_id => Err(ModelError::AlreadyResolved { current, attempted: account_id }),
            _ => {
                self.resolved_account_id = Some(account_id);
                Ok(())
            }
        }
    }
}
