use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, Stderr, StdinLock, Write, stderr, stdin};
use std::path::Path;

use tracing::debug;

use crate::models::TargetAccount;
use crate::resolution::DecisionError;
use crate::types::{AccountId, AccountKey};

const CREATE_NEW: &str = "new";

/// What the operator chose for an account that could not be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    CreateNew,
    Existing(AccountId)
}

/// Asked when neither a saved mapping nor an automatic match resolves an
/// account. May block for as long as the operator needs.
pub trait AccountDecider {
    fn decide(&mut self, key: &AccountKey, accounts: &[TargetAccount]) -> Result<Decision, DecisionError>;
}

/// Numbered menu on a terminal.
pub struct TerminalDecider<R, W> {
    input: R,
    output: W
}

impl TerminalDecider<StdinLock<'static>, Stderr> {
    /// Prompts on stderr, stdout is reserved for results.
    pub fn stdio() -> Self {
        Self::new(stdin().lock(), stderr())
    }
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_menu(&mut self, key: &AccountKey, accounts: &[TargetAccount]) -> Result<(), DecisionError> {
        writeln!(self.output)?;
        writeln!(self.output, "Found account '{}' ({}) in statement", key.display_name(), key.account_type())?;
        writeln!(self.output, "Map this to:")?;
        writeln!(self.output, "  0) Create new account")?;

        for (index, account) in accounts.iter().enumerate() {
            writeln!(self.output, "  {}) {} ({} - {})", index + 1, account.name, account.bank, account.account_type)?;
        }

        Ok(())
    }
}

impl<R: BufRead, W: Write> AccountDecider for TerminalDecider<R, W> {
    fn decide(&mut self, key: &AccountKey, accounts: &[TargetAccount]) -> Result<Decision, DecisionError> {
        self.print_menu(key, accounts)?;

        loop {
            write!(self.output, "Select [0-{}]: ", accounts.len())?;
            self.output.flush()?;

            let mut line = String::new();

            if self.input.read_line(&mut line)? == 0 {
                return Err(DecisionError::Closed);
            }

            match line.trim().parse::<usize>() {
                Ok(0) => return Ok(Decision::CreateNew),
                Ok(choice) if choice <= accounts.len() => return Ok(Decision::Existing(accounts[choice - 1].id)),
                _ => writeln!(self.output, "Invalid choice '{}'", line.trim())?
            }
        }
    }
}

/// Answers from a prepared list, for unattended runs.
///
/// The answers file holds `key: new` or `key: <ledger account id>` lines,
/// keys in the same `number|type` form as the mapping file.
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    answers: HashMap<String, Decision>,
    asked: HashMap<String, usize>
}

impl ScriptedDecider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, DecisionError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| DecisionError::Answers { path: path.to_path_buf(), source })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, DecisionError> {
        let mut decider = Self::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let invalid = || DecisionError::InvalidAnswer { line: index + 1, text: line.to_string() };
            let (key, answer) = line.rsplit_once(':').ok_or_else(invalid)?;

            let decision = match answer.trim() {
                CREATE_NEW => Decision::CreateNew,
                account_id => Decision::Existing(account_id.parse().map_err(|_| invalid())?)
            };

            decider.answers.insert(key.trim().to_string(), decision);
        }

        Ok(decider)
    }
}

#[cfg(test)]
impl ScriptedDecider {
    pub fn with_answer(mut self, key: &str, decision: Decision) -> Self {
        self.answers.insert(key.to_string(), decision);
        self
    }

    pub fn times_asked(&self, key: &str) -> usize {
        self.asked.get(key).copied().unwrap_or_default()
    }
}

impl AccountDecider for ScriptedDecider {
    fn decide(&mut self, key: &AccountKey, _accounts: &[TargetAccount]) -> Result<Decision, DecisionError> {
        let rendered = key.to_string();
        *self.asked.entry(rendered.clone()).or_default() += 1;

        let decision = self.answers.get(&rendered).copied()
            .ok_or(DecisionError::Unscripted(rendered))?;

        debug!("Scripted answer for [{key}]: {decision:?}");

        Ok(decision)
    }
}
