mod cli;
mod ledger;
mod merge;
mod models;
mod normalize;
mod resolution;
mod storage;
mod types;
mod upload;

use std::io::{stderr, stdin, stdout, BufWriter, IsTerminal, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::cli::Cli;
use crate::ledger::{HttpLedgerClient, LedgerService};
use crate::merge::merge_with_summary;
use crate::models::{TargetAccount, Transaction};
use crate::normalize::{read_export_file, ExtractionEngine};
use crate::resolution::{AccountDecider, ResolutionReport, Resolver, ScriptedDecider, TerminalDecider};
use crate::storage::MappingStore;
use crate::upload::upload;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.into());

    let timer = Instant::now();
    let mut transactions = load_transactions(&cli).await?;

    if transactions.is_empty() {
        info!("No transactions to reconcile");
        return Ok(());
    }

    if cli.dry_run {
        return write_results_to_stdout(&transactions);
    }

    let settings = cli.ledger_settings()?;

    if !cli.yes && !confirm_upload(transactions.len())? {
        info!("Upload cancelled");
        return Ok(());
    }

    let client = HttpLedgerClient::new(settings.url, settings.user_id, settings.api_key)?;
    client.verify_user().await?;

    let mut accounts = client.list_accounts().await?;
    info!("Ledger has {} accounts", accounts.len());

    let mut store = MappingStore::open(&cli.mappings)?;

    if store.is_empty() {
        info!("No saved account mappings at {}", store.path().display());
    } else {
        info!("Loaded {} account mappings from {}", store.len(), store.path().display());
    }

    //NOTE: Any resolution failure aborts before a single transaction is uploaded
    let report = match &cli.answers {
        Some(path) => {
            let decider = ScriptedDecider::from_file(path)?;
            resolve_accounts(&cli, decider, &mut store, &client, &mut transactions, &mut accounts).await?
        }
        None => resolve_accounts(&cli, TerminalDecider::stdio(), &mut store, &client, &mut transactions, &mut accounts).await?
    };

    let summary = upload(&client, &transactions, cli.batch_size).await;
    let duration = timer.elapsed();

    info!("Reconciled transactions in: {duration:?}");

    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "{} ok, {} failed ({} batches)", summary.created, summary.failed, summary.batches)?;

    for (account, count) in &report.transactions {
        writeln!(output, "  {account}: {count}")?;
    }

    output.flush()?;

    Ok(())
}

async fn load_transactions(cli: &Cli) -> Result<Vec<Transaction>> {
    let mut primary = Vec::new();

    if let Some(statements) = &cli.pdf {
        let engine = ExtractionEngine::new(&cli.extractor_command, &cli.extractor_dir)?;

        info!("Extracting statements from {}", statements.display());
        let (report, transactions) = engine.run(statements, cli.config.as_deref()).await?;

        for file in &report.files {
            debug!("{}: {} transactions (processed: {})", file.file, file.transaction_count, file.processed);
        }

        primary = transactions;
    }

    let Some(export) = &cli.csv else {
        return Ok(primary);
    };

    let secondary = read_export_file(export)?;
    info!("Read {} transactions from {}", secondary.len(), export.display());

    let (merged, summary) = merge_with_summary(primary, secondary);

    for (suffix, tally) in &summary.accounts {
        debug!("Account ending {suffix}: kept {}, skipped {}", tally.kept, tally.skipped);
    }

    Ok(merged)
}

async fn resolve_accounts<D: AccountDecider>(
    cli: &Cli,
    mut decider: D,
    store: &mut MappingStore,
    client: &HttpLedgerClient,
    transactions: &mut [Transaction],
    accounts: &mut Vec<TargetAccount>
) -> Result<ResolutionReport> {
    let report = Resolver::new(store, &mut decider, client)
        .with_bank(&cli.bank)
        .with_currency(&cli.currency)
        .resolve(transactions, accounts)
        .await?;

    Ok(report)
}

fn confirm_upload(count: usize) -> Result<bool> {
    eprint!("upload {count} transactions? (y/N) ");
    stderr().flush()?;

    let mut answer = String::new();
    stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the dry-run CSV and the final summary, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_ansi(stderr().is_terminal())
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_results_to_stdout(transactions: &[Transaction]) -> Result<()> {
    let mut output = csv::Writer::from_writer(BufWriter::new(stdout().lock()));

    output.write_record([
        "date", "direction", "amount", "currency", "account_number",
        "account_type", "account_name", "description", "source"
    ])?;

    for transaction in transactions {
        output.write_record([
            transaction.date.format("%Y-%m-%d").to_string().as_str(),
            transaction.direction.as_str(),
            transaction.amount.to_string().as_str(),
            transaction.currency.as_str(),
            transaction.source_account_number.as_deref().unwrap_or_default(),
            transaction.source_account_type.as_str(),
            transaction.source_account_name.as_deref().unwrap_or_default(),
            transaction.description.as_str(),
            transaction.source_path.as_str()
        ])?;
    }

    output.flush()?;

    Ok(())
}
