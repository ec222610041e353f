//! Loading closing prices from local files.
//!
//! Two layouts are accepted:
//! - CSV with a header row; the close column is the first of `close`, `c`,
//!   `adj_close` present, or a name given in `LoadOptions::column` (matched
//!   case-insensitively)
//! - plain text with one price per line
//!
//! The layout is detected from the first non-empty line: if it parses as a
//! number the file is plain text.

use std::path::{Path, PathBuf};
use thiserror::Error;

use closelab_core::data::{BarGranularity, DataError, PriceSource};
use closelab_core::PriceSeries;

const CLOSE_COLUMNS: [&str; 3] = ["close", "c", "adj_close"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no close column in {path} (looked for {candidates})")]
    MissingColumn { path: PathBuf, candidates: String },

    #[error("invalid price '{value}' in {path} at line {line}")]
    InvalidPrice {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

/// Options controlling how prices are loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Keep only the most recent N prices.
    pub limit: Option<usize>,
    /// Close column name for CSV input; defaults to the first of `close`,
    /// `c`, `adj_close` found in the header.
    pub column: Option<String>,
}

/// Prices plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub series: PriceSeries,
    pub source_path: PathBuf,
    /// BLAKE3 hash of the loaded prices (after `limit`).
    pub dataset_hash: String,
}

pub fn load_closes(path: &Path, options: &LoadOptions) -> Result<LoadedPrices, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut series = if looks_like_plain_text(&content) {
        parse_plain(path, &content)?
    } else {
        parse_csv(path, &content, options.column.as_deref())?
    };
    if let Some(limit) = options.limit {
        series = series.tail(limit);
    }

    let dataset_hash = series.dataset_hash();
    tracing::debug!(
        path = %path.display(),
        prices = series.len(),
        dataset_hash = %dataset_hash,
        "loaded closing prices"
    );

    Ok(LoadedPrices {
        series,
        source_path: path.to_path_buf(),
        dataset_hash,
    })
}

fn looks_like_plain_text(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map_or(true, |line| line.parse::<f64>().is_ok())
}

fn parse_plain(path: &Path, content: &str) -> Result<PriceSeries, LoadError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_price(path, idx as u64 + 1, line))
        .collect::<Result<Vec<_>, _>>()
        .map(PriceSeries::new)
}

fn parse_csv(path: &Path, content: &str, column: Option<&str>) -> Result<PriceSeries, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(csv_err)?.clone();
    let candidates: Vec<&str> = match column {
        Some(name) => vec![name],
        None => CLOSE_COLUMNS.to_vec(),
    };
    let idx = candidates
        .iter()
        .find_map(|want| headers.iter().position(|h| h.eq_ignore_ascii_case(want)))
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            candidates: candidates.join(", "),
        })?;

    let mut prices = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map_or(0, |p| p.line());
        let field = record.get(idx).unwrap_or_default();
        prices.push(parse_price(path, line, field)?);
    }
    Ok(PriceSeries::new(prices))
}

fn parse_price(path: &Path, line: u64, raw: &str) -> Result<f64, LoadError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(LoadError::InvalidPrice {
            path: path.to_path_buf(),
            line,
            value: trimmed.to_string(),
        }),
    }
}

/// Price source backed by a directory of `<SYMBOL>.csv` files.
///
/// Daily bars only; finer granularities are reported as unsupported.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceSource for CsvDirectorySource {
    fn name(&self) -> &str {
        "csv-directory"
    }

    fn fetch(
        &self,
        symbol: &str,
        limit: usize,
        granularity: BarGranularity,
    ) -> Result<PriceSeries, DataError> {
        if granularity != BarGranularity::Day {
            return Err(DataError::UnsupportedGranularity(granularity.to_string()));
        }

        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let options = LoadOptions {
            limit: Some(limit),
            column: None,
        };
        match load_closes(&path, &options) {
            Ok(loaded) => Ok(loaded.series),
            Err(LoadError::Io { source, .. }) => Err(DataError::Io(source)),
            Err(other) => Err(DataError::Malformed {
                source_name: path.display().to_string(),
                reason: other.to_string(),
            }),
        }
    }
}
