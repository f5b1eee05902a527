use super::{MappingStore, Storage};

use std::fs;

use anyhow::Result;
use tempfile::tempdir;

use crate::types::{AccountKey, SourceAccountType};

fn chequing_key() -> AccountKey {
    AccountKey::new(Some("05172-5163878"), SourceAccountType::Chequing)
}

#[test]
fn test_missing_file_opens_as_empty_store() -> Result<()> {
    let directory = tempdir()?;
    let store = MappingStore::open(directory.path().join("account-mappings.txt"))?;

    assert!(store.is_empty());
    assert!(store.find(&chequing_key()).is_none());

    Ok(())
}

#[test]
fn test_insert_persists_and_survives_reopen() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");

    let mut store = MappingStore::open(&path)?;
    store.insert(&chequing_key(), "Everyday Chequing")?;

    let reopened = MappingStore::open(&path)?;

    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.find(&chequing_key()), Some("Everyday Chequing"));

    Ok(())
}

#[test]
fn test_load_skips_comments_blank_and_malformed_lines() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");
    fs::write(&path, "# header\n\n3802|credit-card: Travel Visa\nnot a mapping\n  1234|savings :  Rainy Day  \n")?;

    let store = MappingStore::open(&path)?;

    assert_eq!(store.len(), 2);
    assert_eq!(store.find(&AccountKey::new(Some("3802"), SourceAccountType::CreditCard)), Some("Travel Visa"));
    assert_eq!(store.find(&AccountKey::new(Some("1234"), SourceAccountType::Savings)), Some("Rainy Day"));

    Ok(())
}

#[test]
fn test_target_names_may_contain_colons() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");
    fs::write(&path, "3802|credit-card: Visa: Travel\n")?;

    let store = MappingStore::open(&path)?;

    assert_eq!(store.find(&AccountKey::new(Some("3802"), SourceAccountType::CreditCard)), Some("Visa: Travel"));

    Ok(())
}

#[test]
fn test_bare_account_number_entries_still_resolve() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");
    fs::write(&path, "05172-5163878: Everyday Chequing\n")?;

    let store = MappingStore::open(&path)?;

    assert_eq!(store.find(&chequing_key()), Some("Everyday Chequing"));

    Ok(())
}

#[test]
fn test_insert_overwrites_and_rewrites_whole_file() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");

    let mut store = MappingStore::open(&path)?;
    store.insert(&AccountKey::new(Some("3802"), SourceAccountType::CreditCard), "Travel Visa")?;
    store.insert(&chequing_key(), "Old Chequing")?;
    store.insert(&chequing_key(), "Everyday Chequing")?;

    let contents = fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();

    assert!(lines[0].starts_with('#'));
    assert_eq!(&lines[1..], ["05172-5163878|chequing: Everyday Chequing", "3802|credit-card: Travel Visa"]);

    Ok(())
}

#[test]
fn test_failed_persist_keeps_in_memory_mapping() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("missing-directory").join("account-mappings.txt");

    let mut store = MappingStore::open(&path)?;
    let result = store.insert(&chequing_key(), "Everyday Chequing");

    assert!(result.is_err());
    assert_eq!(store.find(&chequing_key()), Some("Everyday Chequing"));

    Ok(())
}

#[test]
fn test_no_temporary_files_are_left_behind() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("account-mappings.txt");

    let mut store = MappingStore::open(&path)?;
    store.insert(&chequing_key(), "Everyday Chequing")?;

    assert_eq!(fs::read_dir(directory.path())?.count(), 1);
    assert_eq!(store.path(), path.as_path());

    Ok(())
}
