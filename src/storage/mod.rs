mod errors;
mod mapping_store;
#[cfg(test)]
mod tests;

use crate::types::AccountKey;

pub use errors::StorageError;
pub use mapping_store::MappingStore;

/// Persistent relation from source account identities to ledger account names.
pub trait Storage {
    fn find(&self, key: &AccountKey) -> Option<&str>;
    /// Records the mapping in memory, then persists it. The in-memory entry
    /// stays even when persisting fails.
    fn insert(&mut self, key: &AccountKey, target_name: &str) -> Result<(), StorageError>;
}
