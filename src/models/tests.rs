use super::{SourceAccount, TargetAccount, Transaction, find_by_id, find_by_name_and_type};

use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::errors::ModelError;
use crate::types::{Direction, SourceAccountType, TargetAccountType};

fn create_transaction(amount: &str) -> Result<Option<Transaction>> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow!("invalid test date"))?;

    Ok(Transaction::new(
        date,
        Decimal::from_str(amount)?,
        "CAD",
        "COFFEE SHOP",
        SourceAccount {
            number: Some("05172-5163878".to_string()),
            account_type: SourceAccountType::Chequing,
            name: Some("Personal Chequing".to_string())
        },
        "statement.pdf"
    ))
}

fn create_account(id: i64, name: &str) -> TargetAccount {
    TargetAccount {
        id,
        name: name.to_string(),
        bank: "RBC".to_string(),
        account_type: TargetAccountType::Chequing,
        currency: "CAD".to_string()
    }
}

#[test]
fn test_negative_amount_is_folded_into_outgoing_direction() -> Result<()> {
    let transaction = create_transaction("-12.50")?.ok_or_else(|| anyhow!("transaction was dropped"))?;

    assert_eq!(transaction.amount, Decimal::from_str("12.50")?);
    assert_eq!(transaction.direction, Direction::Outgoing);

    Ok(())
}

#[test]
fn test_positive_amount_is_incoming() -> Result<()> {
    let transaction = create_transaction("1000")?.ok_or_else(|| anyhow!("transaction was dropped"))?;

    assert_eq!(transaction.amount, Decimal::from_str("1000")?);
    assert_eq!(transaction.direction, Direction::Incoming);

    Ok(())
}

#[test]
fn test_zero_amount_is_dropped() -> Result<()> {
    assert!(create_transaction("0.00")?.is_none());
    assert!(create_transaction("-0")?.is_none());

    Ok(())
}

#[test]
fn test_account_key_uses_reported_number_and_type() -> Result<()> {
    let transaction = create_transaction("5")?.ok_or_else(|| anyhow!("transaction was dropped"))?;

    assert_eq!(transaction.account_key().to_string(), "05172-5163878|chequing");

    Ok(())
}

#[test]
fn test_resolved_account_cannot_be_reassigned() -> Result<()> {
    let mut transaction = create_transaction("5")?.ok_or_else(|| anyhow!("transaction was dropped"))?;

    assert_eq!(transaction.resolved_account_id(), None);

    transaction.assign_account(7)?;
    transaction.assign_account(7)?;

    let result = transaction.assign_account(8);

    assert!(matches!(result, Err(ModelError::AlreadyResolved { current: 7, attempted: 8 })));
    assert_eq!(transaction.resolved_account_id(), Some(7));

    Ok(())
}

#[test]
fn test_find_by_name_ignores_case() {
    let accounts = vec![create_account(1, "Everyday Chequing"), create_account(2, "Travel Visa")];

    let found = find_by_name_and_type(&accounts, "everyday CHEQUING", TargetAccountType::Chequing);

    assert_eq!(found.map(|account| account.id), Some(1));
    assert!(find_by_name_and_type(&accounts, "Savings", TargetAccountType::Savings).is_none());
}

#[test]
fn test_find_by_name_prefers_expected_type_among_shared_names() {
    let credit_card = TargetAccount { account_type: TargetAccountType::CreditCard, ..create_account(2, "3802") };
    let accounts = vec![create_account(1, "3802"), credit_card];

    let preferred = find_by_name_and_type(&accounts, "3802", TargetAccountType::CreditCard);
    let fallback = find_by_name_and_type(&accounts, "3802", TargetAccountType::Savings);

    assert_eq!(preferred.map(|account| account.id), Some(2));
    assert_eq!(fallback.map(|account| account.id), Some(1));
}

#[test]
fn test_find_by_id_returns_matching_account() {
    let accounts = vec![create_account(1, "Everyday Chequing"), create_account(2, "Travel Visa")];

    assert_eq!(find_by_id(&accounts, 2).map(|account| account.name.as_str()), Some("Travel Visa"));
    assert!(find_by_id(&accounts, 3).is_none());
}

#[test]
fn test_target_account_deserializes_ledger_json() -> Result<()> {
    let json = r#"{"id": 42, "name": "Travel Visa", "bank": "RBC", "type": "credit_card", "currency": "CAD"}"#;
    let account: TargetAccount = serde_json::from_str(json)?;

    assert_eq!(account.id, 42);
    assert_eq!(account.account_type, TargetAccountType::CreditCard);

    Ok(())
}
