use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::http_probe::prelude::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SECTION_RULE: &str = "--------------------------------------------------";
const CLOSING_RULE: &str = "==================================================";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to append report to {path}")]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Renders one batch as the text block written to the log.
///
/// The first `System` result is rendered above the rule, the `Network` results
/// below it ordered by throughput, highest first. Equal throughputs keep no
/// particular order. The output depends only on `results` and `timestamp`.
pub fn format_batch(results: &[ProbeResult], timestamp: &str) -> String {
    let mut log_text = String::new();
    let _ = writeln!(log_text, "========== Test Batch: {timestamp} ==========");

    if let Some(login) = results.iter().find(|r| r.kind == ProbeKind::System) {
        let _ = writeln!(
            log_text,
            "[System Task] {} | Status: {} | Time: {}ms",
            login.label, login.status, login.elapsed_ms
        );
        if let Some(error) = &login.error_message {
            let _ = writeln!(log_text, "  Error: {error}");
        }
    }
    let _ = writeln!(log_text, "{SECTION_RULE}");

    let mut downloads: Vec<&ProbeResult> = results
        .iter()
        .filter(|r| r.kind == ProbeKind::Network)
        .collect();
    downloads.sort_by(|a, b| b.throughput_bytes_per_sec.total_cmp(&a.throughput_bytes_per_sec));

    for result in downloads {
        match result.status {
            ProbeStatus::Success => {
                let _ = writeln!(
                    log_text,
                    "[URL] Time: {:<4}ms | Speed: {:<9.2} B/s | {}",
                    result.elapsed_ms, result.throughput_bytes_per_sec, result.label
                );
            }
            ProbeStatus::Failed => {
                let _ = writeln!(
                    log_text,
                    "[URL] Status: FAILED | Time: {}ms | {} (Err: {})",
                    result.elapsed_ms,
                    result.label,
                    result.error_message.as_deref().unwrap_or_default()
                );
            }
        }
    }

    let _ = writeln!(log_text, "{CLOSING_RULE}");
    log_text.push('\n');
    log_text
}

/// Appends batch reports to a log file, creating it on first use.
pub struct Reporter {
    log_path: PathBuf,
}

impl Reporter {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Reporter {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Formats `results` under the current local time and appends the block.
    /// Returns the block that was written.
    pub async fn report(&self, results: &[ProbeResult]) -> Result<String, ReportError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let block = format_batch(results, &timestamp);
        self.append(&block).await?;
        Ok(block)
    }

    pub async fn append(&self, block: &str) -> Result<(), ReportError> {
        let to_error = |source| ReportError::Append {
            path: self.log_path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .map_err(to_error)?;
        file.write_all(block.as_bytes()).await.map_err(to_error)?;
        file.flush().await.map_err(to_error)?;
        log::debug!("Appended {} bytes to {}", block.len(), self.log_path.display());
        Ok(())
    }
}
