use std::path::{Path, PathBuf, absolute};

use tokio::process::Command;
use tracing::{debug, info};

use crate::models::Transaction;
use crate::normalize::{ExtractionError, ExtractionReport, parse_extraction_output};

/// Runs the external statement extraction engine and normalizes its output.
pub struct ExtractionEngine {
    program: String,
    arguments: Vec<String>,
    working_directory: PathBuf
}

impl ExtractionEngine {
    /// `command` is split on whitespace, e.g. `uv run python main.py`.
    pub fn new(command: &str, working_directory: impl Into<PathBuf>) -> Result<Self, ExtractionError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ExtractionError::EmptyCommand)?;

        Ok(Self {
            program,
            arguments: parts.collect(),
            working_directory: working_directory.into()
        })
    }

    /// Extracts every statement under `statements` (a file or a directory).
    pub async fn run(&self, statements: &Path, config: Option<&Path>) -> Result<(ExtractionReport, Vec<Transaction>), ExtractionError> {
        //NOTE: The engine runs in its own working directory, relative paths would resolve against it
        let mut command = Command::new(&self.program);
        command.args(&self.arguments)
            .arg(absolute_path(statements)?)
            .args(["--format", "json"])
            .current_dir(&self.working_directory);

        if let Some(config) = config {
            command.arg("--config").arg(absolute_path(config)?);
        }

        debug!("Running extraction engine: {command:?}");

        let output = command.output().await
            .map_err(|source| ExtractionError::Spawn { program: self.program.clone(), source })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            return Err(ExtractionError::Failed { status: output.status, output: combined });
        }

        let (report, transactions) = parse_extraction_output(&String::from_utf8_lossy(&output.stdout))?;

        info!(
            "Extracted {} transactions from {}/{} files",
            report.summary.total_transactions, report.summary.processed_files, report.summary.total_files
        );

        Ok((report, transactions))
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, ExtractionError> {
    absolute(path).map_err(|source| ExtractionError::Path { path: path.to_path_buf(), source })
}
