use thiserror::Error;

use crate::types::AccountId;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Transaction is already assigned to account [{current}], refusing to reassign to [{attempted}]")]
    AlreadyResolved {
        current: AccountId,
        attempted: AccountId
    }
}
