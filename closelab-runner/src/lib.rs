//! CloseLab Runner — parameter sweeps, ranking, loading and export.
//!
//! This crate builds on `closelab-core` to provide:
//! - Parameter grids and TOML sweep configuration
//! - Partitioned sweeps (sequential or rayon-parallel, cancellable)
//! - Ranking of sweep results by total profit
//! - Loading closing prices from CSV / plain text files
//! - Flat JSON and JSON Lines export
//! - Cross-ticker strategy comparison

pub mod compare;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod export;
pub mod grid;
pub mod partition;
pub mod rank;
pub mod result;
pub mod sweep;

pub use compare::{compare_tickers, Comparison};
pub use config::{ConfigError, RunId, SweepConfig};
pub use data_loader::{load_closes, CsvDirectorySource, LoadError, LoadOptions, LoadedPrices};
pub use error::SweepError;
pub use export::{
    append_jsonl, read_jsonl, write_json, ExportError, OutcomeRecord, SweepMeta, SweepRow,
};
pub use grid::{float_range, int_range, ParamGrid, ParamKey};
pub use partition::{partition_bounds, PartitionSpec};
pub use rank::{rank, rank_by, Ranking, SortOrder};
pub use result::{SweepRecord, SweepResult};
pub use sweep::{CancelToken, ParamSweep};
