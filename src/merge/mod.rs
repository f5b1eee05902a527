
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::models::Transaction;

const SUFFIX_LENGTH: usize = 4;

/// Kept and skipped secondary records for one account suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuffixTally {
    pub kept: usize,
    pub skipped: usize
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Keyed by account suffix; records without an account number are not listed.
    pub accounts: BTreeMap<String, SuffixTally>,
    pub kept: usize,
    pub skipped: usize
}

/// Merges the secondary source into the primary one.
///
/// The primary source is authoritative for every date it covers: a secondary
/// record is kept only when it is dated strictly after the latest primary
/// record for the same account, or when the primary source has nothing for
/// that account. Accounts are compared by the last four digits of their
/// number since the sources report numbers of different lengths.
pub fn merge(primary: Vec<Transaction>, secondary: Vec<Transaction>) -> Vec<Transaction> {
    merge_with_summary(primary, secondary).0
}

pub fn merge_with_summary(primary: Vec<Transaction>, secondary: Vec<Transaction>) -> (Vec<Transaction>, MergeSummary) {
    let mut cutoffs = HashMap::<String, Option<NaiveDateTime>>::new();
    let mut summary = MergeSummary::default();
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());

    let primary_numbers: Vec<Option<AccountNumber>> = primary.iter()
        .map(|transaction| AccountNumber::parse(transaction.source_account_number.as_deref()))
        .collect();

    for transaction in secondary {
        let Some(suffix) = account_suffix(transaction.source_account_number.as_deref()) else {
            summary.kept += 1;
            merged.push(transaction);
            continue;
        };

        let cutoff = *cutoffs.entry(suffix.clone()).or_insert_with(|| {
            let cutoff = latest_date(&primary, &primary_numbers, &suffix);
            debug!("Cutoff for account ending [{suffix}]: {cutoff:?}");
            cutoff
        });

        let tally = summary.accounts.entry(suffix).or_default();

        if cutoff.is_none_or(|cutoff| transaction.date > cutoff) {
            tally.kept += 1;
            summary.kept += 1;
            merged.push(transaction);
        } else {
            tally.skipped += 1;
            summary.skipped += 1;
        }
    }

    info!("Merged {} new secondary transactions, skipped {} already covered by the primary source", summary.kept, summary.skipped);

    let mut result = primary;
    result.append(&mut merged);

    (result, summary)
}

/// The last four digits of an account number, or the whole number when it has
/// fewer than four digits. `None` when there is no number at all.
pub fn account_suffix(number: Option<&str>) -> Option<String> {
    let number = number.map(str::trim).filter(|number| !number.is_empty())?;
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();

    if digits.len() < SUFFIX_LENGTH {
        return Some(number.to_string());
    }

    Some(digits[digits.len() - SUFFIX_LENGTH..].iter().collect())
}

/// A primary account number as compared against secondary suffixes.
struct AccountNumber {
    raw: String,
    digits: String
}

impl AccountNumber {
    fn parse(number: Option<&str>) -> Option<Self> {
        let raw = number.map(str::trim).filter(|number| !number.is_empty())?;

        Some(Self {
            raw: raw.to_string(),
            digits: raw.chars().filter(char::is_ascii_digit).collect()
        })
    }

    /// Suffixes shorter than four digits come from short secondary numbers,
    /// which still belong to any longer primary number ending with them.
    fn ends_with(&self, suffix: &str) -> bool {
        self.digits.ends_with(suffix) || self.raw.ends_with(suffix)
    }
}

fn latest_date(primary: &[Transaction], numbers: &[Option<AccountNumber>], suffix: &str) -> Option<NaiveDateTime> {
    primary.iter()
        .zip(numbers)
        .filter(|(_, number)| number.as_ref().is_some_and(|number| number.ends_with(suffix)))
        .map(|(transaction, _)| transaction.date)
        .max()
}
