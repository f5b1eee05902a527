use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read mappings from [{}]: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error
    },
    #[error("Failed to write mappings to [{}]: {source}", path.display())]
    Write {
        path: PathBuf,
        source: io::Error
    }
}
