use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::ledger::LedgerService;
use crate::models::{NewAccount, TargetAccount, Transaction, find_by_id, find_by_name_and_type};
use crate::normalize::DEFAULT_CURRENCY;
use crate::resolution::{AccountDecider, Decision, ResolutionError};
use crate::storage::Storage;
use crate::types::{AccountId, AccountKey};

pub const DEFAULT_BANK: &str = "RBC";

/// How an account identity was resolved during the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Through a mapping saved before this run, looked up again when assigning.
    Mapped,
    /// Name and type already agree with a ledger account. Nothing is persisted.
    Automatic(AccountId),
    /// Created or selected by the operator. The mapping is persisted, but the
    /// id is what gets assigned since names are not unique across types.
    Chosen(AccountId)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub mapped: usize,
    pub automatic: usize,
    pub selected: usize,
    pub created: usize,
    /// Transactions assigned per account identity.
    pub transactions: BTreeMap<String, usize>
}

/// Assigns a ledger account to every transaction.
///
/// Each distinct account identity is resolved once: saved mapping first, then
/// an automatic name and type match, then the operator. The second pass then
/// assigns accounts from those decisions without any further side effects.
pub struct Resolver<'a, S, D, L> {
    storage: &'a mut S,
    decider: &'a mut D,
    ledger: &'a L,
    bank: String,
    currency: String
}

impl<'a, S: Storage, D: AccountDecider, L: LedgerService> Resolver<'a, S, D, L> {
    pub fn new(storage: &'a mut S, decider: &'a mut D, ledger: &'a L) -> Self {
        Self {
            storage,
            decider,
            ledger,
            bank: DEFAULT_BANK.to_string(),
            currency: DEFAULT_CURRENCY.to_string()
        }
    }

    /// Bank tag given to accounts created during resolution.
    pub fn with_bank(mut self, bank: &str) -> Self {
        self.bank = bank.to_string();
        self
    }

    /// Main currency given to accounts created during resolution.
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    /// Resolves every transaction against `accounts`, appending any account
    /// created along the way.
    ///
    /// # Errors
    /// Fails when the operator cannot be asked, picks an unknown account, the
    /// ledger refuses to create an account, or an identity ends the first pass
    /// without an account.
    pub async fn resolve(&mut self, transactions: &mut [Transaction], accounts: &mut Vec<TargetAccount>) -> Result<ResolutionReport, ResolutionError> {
        let mut report = ResolutionReport::default();
        let mut outcomes = HashMap::<AccountKey, Outcome>::new();

        for transaction in transactions.iter() {
            let key = transaction.account_key();

            if outcomes.contains_key(&key) {
                continue;
            }

            let outcome = self.resolve_key(&key, accounts, &mut report).await?;
            outcomes.insert(key, outcome);
        }

        for transaction in transactions.iter_mut() {
            let key = transaction.account_key();
            let account_id = self.assigned_account(&key, &outcomes, accounts)?;

            transaction.assign_account(account_id)?;
            *report.transactions.entry(key.to_string()).or_default() += 1;
        }

        info!(
            "Resolved {} account identities: {} mapped, {} automatic, {} selected, {} created",
            outcomes.len(), report.mapped, report.automatic, report.selected, report.created
        );

        Ok(report)
    }

    async fn resolve_key(&mut self, key: &AccountKey, accounts: &mut Vec<TargetAccount>, report: &mut ResolutionReport) -> Result<Outcome, ResolutionError> {
        let expected = key.account_type().expected_target();

        if let Some(target) = self.storage.find(key) {
            if find_by_name_and_type(accounts, target, expected).is_some() {
                debug!("Account [{key}] mapped to [{target}]");
                report.mapped += 1;
                return Ok(Outcome::Mapped);
            }

            warn!("Saved mapping for [{key}] points to missing account [{target}], asking again");
        }

        let automatic = accounts.iter().find(|account| {
            account.account_type == expected && account.name.to_lowercase() == key.display_name().to_lowercase()
        });

        if let Some(account) = automatic {
            debug!("Account [{key}] matched ledger account [{}] by name", account.name);
            report.automatic += 1;
            return Ok(Outcome::Automatic(account.id));
        }

        let decision = self.decider.decide(key, accounts)
            .map_err(|source| ResolutionError::Decision { key: key.to_string(), source })?;

        let (account_id, target_name) = match decision {
            Decision::CreateNew => {
                let new_account = NewAccount {
                    name: key.display_name().to_string(),
                    bank: self.bank.clone(),
                    account_type: expected,
                    currency: self.currency.clone()
                };

                let account = self.ledger.create_account(&new_account).await
                    .map_err(|source| ResolutionError::Ledger { key: key.to_string(), source })?;

                let chosen = (account.id, account.name.clone());
                accounts.push(account);
                report.created += 1;
                chosen
            }
            Decision::Existing(account_id) => {
                let account = find_by_id(accounts, account_id)
                    .ok_or_else(|| ResolutionError::UnknownSelection { key: key.to_string(), account_id })?;

                //NOTE: A mismatched type is allowed to persist into the mapping file
                if account.account_type != expected {
                    warn!(
                        "Account [{key}] type mismatch: statement expects {expected} but [{}] is {} (continuing anyway)",
                        account.name, account.account_type
                    );
                }

                report.selected += 1;
                (account.id, account.name.clone())
            }
        };

        if let Err(error) = self.storage.insert(key, &target_name) {
            warn!("Mapping [{key}] -> [{target_name}] will not survive this run: {error}");
        }

        Ok(Outcome::Chosen(account_id))
    }

    fn assigned_account(&self, key: &AccountKey, outcomes: &HashMap<AccountKey, Outcome>, accounts: &[TargetAccount]) -> Result<AccountId, ResolutionError> {
        let inconsistent = |reason: String| ResolutionError::Inconsistent { key: key.to_string(), reason };

        match outcomes.get(key) {
            Some(Outcome::Automatic(account_id) | Outcome::Chosen(account_id)) => Ok(*account_id),
            Some(Outcome::Mapped) => {
                let target = self.storage.find(key)
                    .ok_or_else(|| inconsistent("mapping disappeared".to_string()))?;

                find_by_name_and_type(accounts, target, key.account_type().expected_target())
                    .map(|account| account.id)
                    .ok_or_else(|| inconsistent(format!("mapped account [{target}] is not a ledger account")))
            }
            None => Err(inconsistent("identity was never resolved".to_string()))
        }
    }
}
