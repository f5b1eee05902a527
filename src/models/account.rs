use serde::{Deserialize, Serialize};

use crate::types::{AccountId, TargetAccountType};

/// An account as known to the ledger service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAccount {
    pub id: AccountId,
    pub name: String,
    #[serde(default)]
    pub bank: String,
    #[serde(rename = "type", default)]
    pub account_type: TargetAccountType,
    #[serde(default)]
    pub currency: String
}

/// Request body for creating a ledger account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub bank: String,
    #[serde(rename = "type")]
    pub account_type: TargetAccountType,
    pub currency: String
}

/// Case-insensitive lookup by name that prefers an account of `account_type`
/// when several ledger accounts share the name.
pub fn find_by_name_and_type<'a>(accounts: &'a [TargetAccount], name: &str, account_type: TargetAccountType) -> Option<&'a TargetAccount> {
    let name = name.to_lowercase();
    let mut matching = accounts.iter().filter(|account| account.name.to_lowercase() == name);
    let first = matching.next()?;

    if first.account_type == account_type {
        return Some(first);
    }

    matching.find(|account| account.account_type == account_type).or(Some(first))
}

pub fn find_by_id(accounts: &[TargetAccount], account_id: AccountId) -> Option<&TargetAccount> {
    accounts.iter().find(|account| account.id == account_id)
}
