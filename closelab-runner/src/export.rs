//! Flat result records and their JSON / JSON Lines writers.
//!
//! Every exported record is one level deep with scalar fields only, so the
//! files load directly into spreadsheets and dataframe tools.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use closelab_core::{StrategyKind, StrategyParameters, TradeOutcome};

use crate::config::RunId;
use crate::rank::Ranking;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub symbol: String,
    pub strategy: StrategyKind,
    pub window_days: usize,
    pub percent_diff: f64,
    pub allow_short: bool,
    pub total_profit: f64,
    pub return_percentage: f64,
    pub first_entry_price: Option<f64>,
    pub trade_count: usize,
}

impl OutcomeRecord {
    pub fn new(
        symbol: impl Into<String>,
        strategy: StrategyKind,
        params: &StrategyParameters,
        outcome: &TradeOutcome,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            strategy,
            window_days: params.window_days,
            percent_diff: params.percent_diff,
            allow_short: params.allow_short,
            total_profit: outcome.total_profit,
            return_percentage: outcome.return_percentage,
            first_entry_price: outcome.first_entry_price,
            trade_count: outcome.trade_count,
        }
    }
}

/// Identifies the sweep a set of rows came from.
#[derive(Debug, Clone)]
pub struct SweepMeta {
    pub symbol: String,
    pub strategy: StrategyKind,
    pub run_id: RunId,
    pub dataset_hash: String,
    pub generated_at: DateTime<Utc>,
}

/// One ranked (or unranked) sweep record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub symbol: String,
    pub strategy: StrategyKind,
    pub run_id: RunId,
    pub dataset_hash: String,
    pub generated_at: DateTime<Utc>,
    /// 1-based position for ranked output; absent for `Ranking::All`.
    pub rank: Option<usize>,
    pub window_days: usize,
    pub percent_diff: f64,
    pub total_profit: f64,
    pub percent_gain: f64,
    pub first_entry_price: Option<f64>,
    pub sample_count: usize,
}

impl SweepRow {
    pub fn from_ranking(meta: &SweepMeta, ranking: Ranking) -> Vec<SweepRow> {
        let ordered = ranking.is_ordered();
        ranking
            .into_records()
            .into_iter()
            .enumerate()
            .map(|(idx, record)| SweepRow {
                symbol: meta.symbol.clone(),
                strategy: meta.strategy,
                run_id: meta.run_id.clone(),
                dataset_hash: meta.dataset_hash.clone(),
                generated_at: meta.generated_at,
                rank: ordered.then_some(idx + 1),
                window_days: record.window_days,
                percent_diff: record.percent_diff,
                total_profit: record.total_profit,
                percent_gain: record.percent_gain,
                first_entry_price: record.first_entry_price,
                sample_count: record.sample_count,
            })
            .collect()
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_err(path))
        }
        _ => Ok(()),
    }
}

/// Write `rows` as a pretty-printed JSON array, replacing the file.
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(rows).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        line: 0,
        source,
    })?;
    fs::write(path, json + "\n").map_err(io_err(path))
}

/// Append one JSON object per row. Returns the number of rows written.
pub fn append_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize, ExportError> {
    ensure_parent(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err(path))?;
    let mut writer = BufWriter::new(file);

    for (idx, row) in rows.iter().enumerate() {
        let json = serde_json::to_string(row).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        writeln!(writer, "{json}").map_err(io_err(path))?;
    }
    writer.flush().map_err(io_err(path))?;
    Ok(rows.len())
}

/// Read every row of a JSON Lines file. Blank lines are skipped; a
/// malformed line is an error. A missing file reads as empty.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExportError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(path)(e)),
    };

    let mut rows = Vec::new();
    for (idx, line) in io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}
