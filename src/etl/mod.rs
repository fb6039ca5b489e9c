//! Dataset import: read the CSV files, normalize, load into the store.

pub mod load;
pub mod normalize;
pub mod source;

use crate::db::Store;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use load::load;
pub use normalize::{NormalizedDataset, normalize};

/// Failures that stop an import run. Per-row problems are [`RowError`]s.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read header of {origin} file: {source}")]
    Header {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {origin} file: {source}")]
    Read {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write reject log {}: {source}", .path.display())]
    RejectLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectStage {
    Decode,
    Normalize,
    Load,
}

/// A source row (or derived row) that was excluded from the load.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{origin} line {}: {reason}", .line.map_or_else(|| "?".to_string(), |l| l.to_string()))]
pub struct RowError {
    pub stage: RejectStage,
    /// Source file (`titles` / `credits`) or target table
    pub origin: String,
    pub line: Option<u64>,
    /// Source id of the title, when known
    pub key: Option<String>,
    pub reason: String,
}

impl RowError {
    pub fn new(
        stage: RejectStage,
        origin: &str,
        line: Option<u64>,
        key: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            origin: origin.to_string(),
            line,
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Inserted,
    Skipped,
    Failed,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub inserted: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub tables: BTreeMap<&'static str, TableStats>,
    pub rejected: Vec<RowError>,
}

impl LoadReport {
    pub fn record(&mut self, table: &'static str, outcome: Outcome) {
        let stats = self.tables.entry(table).or_default();
        match outcome {
            Outcome::Inserted => stats.inserted += 1,
            Outcome::Skipped => stats.skipped += 1,
            Outcome::Failed => stats.failed += 1,
        }

        metrics::counter!("etl_rows_total", "table" => table, "outcome" => outcome.as_str())
            .increment(1);
    }

    #[must_use]
    pub fn table(&self, table: &str) -> TableStats {
        self.tables.get(table).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn total_inserted(&self) -> u64 {
        self.tables.values().map(|s| s.inserted).sum()
    }

    #[must_use]
    pub fn total_failed(&self) -> u64 {
        self.tables.values().map(|s| s.failed).sum()
    }
}

/// Appends rejected rows to `path`, one JSON object per line.
pub fn write_reject_log(path: &Path, rows: &[RowError]) -> Result<(), EtlError> {
    let to_err = |source: std::io::Error| EtlError::RejectLog {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)?;

    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| to_err(e.into()))?;
        writeln!(file, "{line}").map_err(to_err)?;
    }

    Ok(())
}

/// Runs a full import. Only unreadable inputs or an unwritable reject log
/// abort the run; everything else ends up in the report.
pub async fn run(
    store: &Store,
    titles_path: &Path,
    credits_path: &Path,
    reject_log: Option<&Path>,
) -> Result<LoadReport, EtlError> {
    info!("Reading titles from {}", titles_path.display());
    let titles = source::read_titles(titles_path)?;

    info!("Reading credits from {}", credits_path.display());
    let credits = source::read_credits(credits_path)?;

    info!(
        titles = titles.rows.len(),
        credits = credits.rows.len(),
        "Source files decoded"
    );

    let dataset = normalize(&titles.rows, &credits.rows);

    let mut report = load(store, &dataset).await;

    let mut rejected = titles.errors;
    rejected.extend(credits.errors);
    rejected.extend(dataset.rejected);
    rejected.append(&mut report.rejected);
    report.rejected = rejected;

    if let Some(path) = reject_log
        && !report.rejected.is_empty()
    {
        write_reject_log(path, &report.rejected)?;
        warn!(
            "{} rejected rows written to {}",
            report.rejected.len(),
            path.display()
        );
    }

    info!(
        inserted = report.total_inserted(),
        failed = report.total_failed(),
        rejected = report.rejected.len(),
        "Import finished"
    );

    Ok(report)
}
