mod account;
mod errors;
#[cfg(test)]
mod tests;
mod transaction;

pub use account::{NewAccount, TargetAccount, find_by_id, find_by_name_and_type};
pub use errors::ModelError;
pub use transaction::{SourceAccount, Transaction};
