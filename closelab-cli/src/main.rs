//! CloseLab CLI — simulate, sweep, compare and advise commands.
//!
//! Commands:
//! - `simulate`: run one strategy with fixed parameters on a price file
//! - `sweep`: grid-search window / band parameters, optionally partitioned
//! - `compare`: run every strategy on several tickers and pick the best
//! - `advise`: report today's signal and submit it to a paper order sink

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use closelab_core::data::{
    BarGranularity, OrderSide, OrderSink, PaperOrderSink, PriceSource, TradeIntent,
};
use closelab_core::sampling::random_day_range;
use closelab_core::{
    advise, StrategyKind, StrategyParameters, TracingSink, TradeEvent, TradeOutcome,
};
use closelab_runner::config::PartitionInput;
use closelab_runner::{
    append_jsonl, compare_tickers, load_closes, rank, write_json, CancelToken, CsvDirectorySource,
    LoadOptions, LoadedPrices, OutcomeRecord, ParamSweep, SweepConfig, SweepMeta, SweepRow,
};

#[derive(Parser)]
#[command(
    name = "closelab",
    about = "CloseLab CLI — closing-price strategy backtests and parameter sweeps"
)]
struct Cli {
    /// Log at debug level (trade fills, loader details).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PriceArgs {
    /// CSV (with a close/c column) or plain text file of closing prices.
    #[arg(long)]
    prices: PathBuf,

    /// Close column name for CSV input.
    #[arg(long)]
    column: Option<String>,

    /// Keep only the most recent N prices.
    #[arg(long)]
    limit: Option<usize>,

    /// Symbol label for output. Defaults to the file stem.
    #[arg(long)]
    symbol: Option<String>,
}

impl PriceArgs {
    fn load(&self) -> Result<LoadedPrices> {
        let options = LoadOptions {
            limit: self.limit,
            column: self.column.clone(),
        };
        load_closes(&self.prices, &options)
            .with_context(|| format!("loading prices from {}", self.prices.display()))
    }

    fn symbol(&self) -> String {
        self.symbol.clone().unwrap_or_else(|| {
            self.prices
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "UNKNOWN".to_string())
        })
    }
}

#[derive(Args)]
struct StrategyArgs {
    /// simple_moving_average (sma), bollinger_bands (bb) or mean_reversion (mr).
    #[arg(long, default_value = "mean_reversion")]
    strategy: String,

    /// Trailing window length in days.
    #[arg(long, default_value_t = 5)]
    window: usize,

    /// Band half-width in percent.
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    diff: f64,

    /// Allow short positions (bollinger_bands only).
    #[arg(long, default_value_t = false)]
    allow_short: bool,
}

impl StrategyArgs {
    fn resolve(&self) -> Result<(StrategyKind, StrategyParameters)> {
        let kind: StrategyKind = self.strategy.parse()?;
        let params =
            StrategyParameters::new(self.window, self.diff).with_short_selling(self.allow_short);
        Ok((kind, params))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one strategy with fixed parameters.
    Simulate {
        #[command(flatten)]
        input: PriceArgs,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Print every fill.
        #[arg(long, default_value_t = false)]
        trades: bool,

        /// Simulate on a random contiguous range of at least this many days.
        #[arg(long)]
        sample_min: Option<usize>,

        /// Seed for --sample-min. Without it the range differs per run.
        #[arg(long)]
        seed: Option<u64>,

        /// Append the outcome to a JSON Lines file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Grid-search window and band parameters.
    Sweep {
        #[command(flatten)]
        input: PriceArgs,

        /// TOML file with a [sweep] table. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        strategy: Option<String>,

        /// Partition count (e.g. 3) or comma-separated list (e.g. 1,2,3).
        #[arg(long)]
        partitions: Option<String>,

        /// Number of results to keep; -1 keeps every combination.
        #[arg(long, allow_negative_numbers = true)]
        top_k: Option<i64>,

        #[arg(long, default_value_t = false)]
        allow_short: bool,

        /// Run on a single thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Cancel the sweep after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Write rows here: `.json` replaces the file, anything else appends JSON Lines.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run every strategy on several tickers and report the best per strategy.
    Compare {
        /// Symbols to compare; each is read from <data-dir>/<SYMBOL>.csv.
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, default_value_t = 5)]
        window: usize,

        #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
        diff: f64,

        /// Applied to strategies that support short selling.
        #[arg(long, default_value_t = false)]
        allow_short: bool,

        /// Most recent N daily closes per symbol.
        #[arg(long, default_value_t = 1000)]
        limit: usize,

        /// Write all outcomes as a JSON array.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report the action the strategy takes on the latest close (dry run).
    Advise {
        #[command(flatten)]
        input: PriceArgs,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Shares per order.
        #[arg(long, default_value_t = 1)]
        shares: u32,

        /// Submit a market order instead of a limit at the signal price.
        #[arg(long, default_value_t = false)]
        market: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            input,
            strategy,
            trades,
            sample_min,
            seed,
            output,
        } => run_simulate(&input, &strategy, trades, sample_min, seed, output.as_deref()),
        Commands::Sweep {
            input,
            config,
            strategy,
            partitions,
            top_k,
            allow_short,
            sequential,
            timeout_secs,
            output,
        } => {
            let config = build_sweep_config(
                config.as_deref(),
                strategy.as_deref(),
                partitions.as_deref(),
                top_k,
                allow_short,
                sequential,
            )?;
            run_sweep(&input, &config, timeout_secs, output.as_deref())
        }
        Commands::Compare {
            symbols,
            data_dir,
            window,
            diff,
            allow_short,
            limit,
            output,
        } => {
            let params = StrategyParameters::new(window, diff).with_short_selling(allow_short);
            run_compare(&symbols, &data_dir, &params, limit, output.as_deref())
        }
        Commands::Advise {
            input,
            strategy,
            shares,
            market,
        } => run_advise(&input, &strategy, shares, market),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_simulate(
    input: &PriceArgs,
    strategy: &StrategyArgs,
    print_trades: bool,
    sample_min: Option<usize>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let loaded = input.load()?;
    let symbol = input.symbol();
    let (kind, params) = strategy.resolve()?;

    let prices: &[f64] = match sample_min {
        Some(min_range) => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let sample = random_day_range(&loaded.series, min_range, &mut rng)?;
            tracing::info!(
                sampled = sample.len(),
                available = loaded.series.len(),
                "simulating on a random day range"
            );
            sample
        }
        None => &loaded.series,
    };

    let mut events: Vec<TradeEvent> = Vec::new();
    let outcome = if print_trades {
        kind.simulate_with(prices, &params, &mut events)?
    } else {
        kind.simulate_with(prices, &params, &mut TracingSink::new(symbol.clone()))?
    };

    print_outcome(&symbol, kind, &params, prices.len(), &outcome);
    if print_trades {
        println!("--- Fills ---");
        for event in &events {
            println!("{event}");
        }
        println!();
    }

    if let Some(path) = output {
        let record = OutcomeRecord::new(symbol, kind, &params, &outcome);
        append_jsonl(path, &[record])?;
        println!("Outcome appended to: {}", path.display());
    }
    Ok(())
}

fn build_sweep_config(
    path: Option<&Path>,
    strategy: Option<&str>,
    partitions: Option<&str>,
    top_k: Option<i64>,
    allow_short: bool,
    sequential: bool,
) -> Result<SweepConfig> {
    let mut config = match path {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };

    if let Some(name) = strategy {
        config.strategy = name.parse()?;
    }
    if let Some(spec) = partitions {
        config.partitions = parse_partitions(spec)?;
    }
    if let Some(k) = top_k {
        config.top_k = k;
    }
    if allow_short {
        config.allow_short = true;
    }
    if sequential {
        config.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

fn parse_partitions(spec: &str) -> Result<PartitionInput> {
    let counts = spec
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .with_context(|| format!("invalid partition count '{part}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    match counts.as_slice() {
        [] => bail!("--partitions needs at least one count"),
        [single] if !spec.contains(',') => Ok(PartitionInput::Single(*single)),
        _ => Ok(PartitionInput::Multiple(counts)),
    }
}

fn run_sweep(
    input: &PriceArgs,
    config: &SweepConfig,
    timeout_secs: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let loaded = input.load()?;
    let grid = config.grid()?;
    let partitions = config.partition_spec()?;

    let token = CancelToken::new();
    if let Some(secs) = timeout_secs {
        let timer = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            timer.cancel();
        });
    }

    let result = ParamSweep::new(config.strategy)
        .with_short_selling(config.allow_short)
        .with_parallelism(config.parallel)
        .with_cancel_token(token)
        .sweep(&loaded.series, &grid, &partitions)?;

    let ranking = rank(result, config.top_k)?;
    let meta = SweepMeta {
        symbol: input.symbol(),
        strategy: config.strategy,
        run_id: config.run_id()?,
        dataset_hash: loaded.dataset_hash.clone(),
        generated_at: Utc::now(),
    };
    let rows = SweepRow::from_ranking(&meta, ranking);

    print_sweep(&meta, grid.size(), loaded.series.len(), &rows);

    if let Some(path) = output {
        if path.extension().is_some_and(|ext| ext == "json") {
            write_json(path, &rows)?;
        } else {
            append_jsonl(path, &rows)?;
        }
        println!("Rows written to: {}", path.display());
    }
    Ok(())
}

fn run_compare(
    symbols: &[String],
    data_dir: &Path,
    params: &StrategyParameters,
    limit: usize,
    output: Option<&Path>,
) -> Result<()> {
    let source = CsvDirectorySource::new(data_dir);
    let mut tickers = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let series = source
            .fetch(symbol, limit, BarGranularity::Day)
            .with_context(|| format!("fetching {symbol} from {}", source.name()))?;
        tickers.push((symbol.clone(), series));
    }

    let comparison = compare_tickers(&tickers, params)?;

    println!();
    println!("=== Strategy Comparison ===");
    println!(
        "Window: {} days   Diff: {}%   Tickers: {}",
        params.window_days,
        params.percent_diff,
        symbols.len()
    );
    println!();
    println!(
        "{:<8} {:<22} {:>12} {:>10} {:>7}",
        "Symbol", "Strategy", "Profit", "Return", "Trades"
    );
    println!("{}", "-".repeat(63));
    for r in &comparison.outcomes {
        println!(
            "{:<8} {:<22} {:>12.2} {:>9.2}% {:>7}",
            r.symbol, r.strategy, r.total_profit, r.return_percentage, r.trade_count
        );
    }
    println!();
    println!("--- Best ticker per strategy ---");
    for (kind, best) in comparison.best_by_strategy() {
        println!(
            "{:<22} {:<8} profit {:.2} ({:.2}%)",
            kind.name(),
            best.symbol,
            best.total_profit,
            best.return_percentage
        );
    }
    println!();

    if let Some(path) = output {
        write_json(path, &comparison.outcomes)?;
        println!("Outcomes written to: {}", path.display());
    }
    Ok(())
}

fn run_advise(
    input: &PriceArgs,
    strategy: &StrategyArgs,
    shares: u32,
    market: bool,
) -> Result<()> {
    let loaded = input.load()?;
    let symbol = input.symbol();
    let (kind, params) = strategy.resolve()?;

    let Some(event) = advise(kind, &loaded.series, &params)? else {
        println!("{symbol}: no {kind} signal on the latest close.");
        return Ok(());
    };

    let intent = if market {
        let side = if event.action.is_buy() {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };
        TradeIntent::market(symbol.clone(), shares, side)
    } else {
        TradeIntent::from_event(symbol.clone(), shares, &event)
    };

    let mut sink = PaperOrderSink::new();
    let ack = sink.submit(&intent)?;
    println!("{symbol}: {kind} signals {} at {:.2} today.", event.action.label(), event.price);
    println!(
        "Paper order {}: {:?} {} x {} ({:?}, {:?})",
        ack.order_id, intent.side, intent.shares, intent.symbol, intent.kind, intent.time_in_force
    );
    Ok(())
}

fn print_outcome(
    symbol: &str,
    kind: StrategyKind,
    params: &StrategyParameters,
    days: usize,
    outcome: &TradeOutcome,
) {
    println!();
    println!("=== Simulation Result ===");
    println!("Symbol:         {symbol}");
    println!("Strategy:       {kind}");
    println!(
        "Parameters:     {} days, {}%{}",
        params.window_days,
        params.percent_diff,
        if params.allow_short { ", shorts allowed" } else { "" }
    );
    println!("Days:           {days}");
    println!("Trades:         {}", outcome.trade_count);
    println!("Total Profit:   {:.2}", outcome.total_profit);
    println!("Return:         {:.2}%", outcome.return_percentage);
    match outcome.first_entry_price {
        Some(price) => println!("First Entry:    {price:.2}"),
        None => println!("First Entry:    (never entered)"),
    }
    println!();
}

fn print_sweep(meta: &SweepMeta, combinations: usize, days: usize, rows: &[SweepRow]) {
    println!();
    println!("=== Parameter Sweep ===");
    println!("Symbol:         {}", meta.symbol);
    println!("Strategy:       {}", meta.strategy);
    println!("Days:           {days}");
    println!("Combinations:   {combinations}");
    println!("Run ID:         {}", &meta.run_id[..12.min(meta.run_id.len())]);
    println!();
    println!(
        "{:>5} {:>7} {:>8} {:>12} {:>10} {:>8}",
        "Rank", "Window", "Diff %", "Profit", "Gain %", "Samples"
    );
    println!("{}", "-".repeat(55));
    for row in rows {
        let rank = row.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
        println!(
            "{:>5} {:>7} {:>8.3} {:>12.2} {:>10.2} {:>8}",
            rank,
            row.window_days,
            row.percent_diff,
            row.total_profit,
            row.percent_gain,
            row.sample_count
        );
    }
    println!();
}
