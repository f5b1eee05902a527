use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::normalize::DEFAULT_CURRENCY;
use crate::resolution::DEFAULT_BANK;
use crate::upload::DEFAULT_BATCH_SIZE;

#[derive(Debug, Parser)]
#[command(name = "statement-reconciler", version, about = "Reconcile bank statements into the ledger")]
#[command(group(ArgGroup::new("input").required(true).multiple(true).args(["pdf", "csv"])))]
pub struct Cli {
    /// Statement PDF file or directory of statements to extract
    #[arg(long, env = "PDF_PATH")]
    pub pdf: Option<PathBuf>,

    /// Bank CSV export to merge with the extracted statements
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Configuration file handed to the extraction engine
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Saved account mappings
    #[arg(long, env = "MAPPINGS_PATH", default_value = "account-mappings.txt")]
    pub mappings: PathBuf,

    /// Answers file (`number|type: new|<account id>`) used instead of prompting
    #[arg(long)]
    pub answers: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Bank tag for accounts created during resolution
    #[arg(long, default_value = DEFAULT_BANK)]
    pub bank: String,

    /// Currency for accounts created during resolution
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Skip the upload confirmation
    #[arg(long, short)]
    pub yes: bool,

    /// Print the merged transactions as CSV and exit without touching the ledger
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Working directory of the extraction engine
    #[arg(long, default_value = "rbc-statement-parser")]
    pub extractor_dir: PathBuf,

    #[arg(long, default_value = "uv run python main.py")]
    pub extractor_command: String,

    #[arg(long, env = "USER_ID")]
    pub user_id: Option<String>,

    /// Base URL of the ledger service
    #[arg(long, env = "LEDGER_URL")]
    pub ledger_url: Option<String>,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE
        }
    }
}

pub struct LedgerSettings<'a> {
    pub url: &'a str,
    pub user_id: &'a str,
    pub api_key: &'a str
}

impl Cli {
    /// Connection settings, only required once the ledger is actually contacted.
    pub fn ledger_settings(&self) -> Result<LedgerSettings<'_>> {
        Ok(LedgerSettings {
            url: required(&self.ledger_url, "LEDGER_URL")?,
            user_id: required(&self.user_id, "USER_ID")?,
            api_key: required(&self.api_key, "API_KEY")?
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value.as_deref()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{name} must be set"))
}
