use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::storage::{Storage, StorageError};
use crate::types::AccountKey;

const HEADER: &str = "# Account mappings: statement_account -> ledger_account";

/// Mapping store backed by a flat `key: target` text file.
///
/// Every insert rewrites the whole file through a temporary file in the same
/// directory followed by a rename, so a crash never leaves a half-written file.
#[derive(Debug)]
pub struct MappingStore {
    path: PathBuf,
    mappings: BTreeMap<String, String>
}

impl MappingStore {
    /// Loads the mapping file at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let mappings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|source| StorageError::Read { path: path.clone(), source })?;
            parse(&contents)
        } else {
            BTreeMap::new()
        };

        debug!("Loaded {} account mappings from {}", mappings.len(), path.display());

        Ok(Self { path, mappings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let write_error = |source| StorageError::Write { path: self.path.clone(), source };

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new(".")
        };

        let temporary = NamedTempFile::new_in(directory).map_err(write_error)?;

        {
            let mut writer = BufWriter::new(temporary.as_file());
            writeln!(writer, "{HEADER}").map_err(write_error)?;

            for (key, target) in &self.mappings {
                writeln!(writer, "{key}: {target}").map_err(write_error)?;
            }

            writer.flush().map_err(write_error)?;
        }

        temporary.as_file().sync_all().map_err(write_error)?;
        temporary.persist(&self.path).map_err(|error| write_error(error.error))?;

        Ok(())
    }
}

impl Storage for MappingStore {
    fn find(&self, key: &AccountKey) -> Option<&str> {
        //NOTE: Files written before keys carried the account type hold the bare account number
        self.mappings.get(&key.to_string())
            .or_else(|| self.mappings.get(key.display_name()))
            .map(String::as_str)
    }

    fn insert(&mut self, key: &AccountKey, target_name: &str) -> Result<(), StorageError> {
        self.mappings.insert(key.to_string(), target_name.trim().to_string());
        self.persist()
    }
}

fn parse(contents: &str) -> BTreeMap<String, String> {
    let mut mappings = BTreeMap::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, target)) = line.split_once(':') else {
            warn!("Skipping malformed mapping on line {}: {line}", index + 1);
            continue;
        };

        mappings.insert(key.trim().to_string(), target.trim().to_string());
    }

    mappings
}
