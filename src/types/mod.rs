mod account_key;
mod errors;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use account_key::{AccountKey, UNKNOWN_ACCOUNT};
pub use errors::TypeError;

pub type AccountId = i64;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing"
        }
    }
}

/// Account type as reported by a statement or export.
///
/// Sources spell these differently (the export calls credit cards `Visa`),
/// normalizers map every known spelling through `FromStr`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SourceAccountType {
    Chequing,
    Savings,
    CreditCard
}

impl SourceAccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceAccountType::Chequing => "chequing",
            SourceAccountType::Savings => "savings",
            SourceAccountType::CreditCard => "credit-card"
        }
    }

    /// The ledger account type an account of this kind is expected to have.
    pub fn expected_target(&self) -> TargetAccountType {
        match self {
            SourceAccountType::Chequing => TargetAccountType::Chequing,
            SourceAccountType::Savings => TargetAccountType::Savings,
            SourceAccountType::CreditCard => TargetAccountType::CreditCard
        }
    }
}

impl FromStr for SourceAccountType {
    type Err = TypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "chequing" | "checking" => Ok(SourceAccountType::Chequing),
            "savings" => Ok(SourceAccountType::Savings),
            "visa" | "mastercard" | "credit card" | "credit-card" | "credit_card" => Ok(SourceAccountType::CreditCard),
            _ => Err(TypeError::UnknownAccountType(value.to_string()))
        }
    }
}

impl Display for SourceAccountType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAccountType {
    #[default]
    Unspecified,
    Chequing,
    Savings,
    CreditCard
}

impl Display for TargetAccountType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetAccountType::Unspecified => "unspecified",
            TargetAccountType::Chequing => "chequing",
            TargetAccountType::Savings => "savings",
            TargetAccountType::CreditCard => "credit card"
        };

        formatter.write_str(label)
    }
}
