use std::fmt;
use std::fmt::{Display, Formatter};

use crate::types::SourceAccountType;

/// Stands in for the account number when a source does not report one.
pub const UNKNOWN_ACCOUNT: &str = "Unknown";

/// Identity of a source-side account: its reported number and type.
///
/// Rendered as `number|type` when used as a mapping store key.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AccountKey {
    number: String,
    account_type: SourceAccountType
}

impl AccountKey {
    pub fn new(number: Option<&str>, account_type: SourceAccountType) -> Self {
        let number = match number.map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => UNKNOWN_ACCOUNT.to_string()
        };

        Self { number, account_type }
    }

    /// The account number, or `Unknown`. Used as the account name when
    /// matching against or creating ledger accounts.
    pub fn display_name(&self) -> &str {
        &self.number
    }

    pub fn account_type(&self) -> SourceAccountType {
        self.account_type
    }
}

impl Display for AccountKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}|{}", self.number, self.account_type)
    }
}
