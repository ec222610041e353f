//! CloseLab Core — price series, strategy simulators, trade events.
//!
//! This crate contains the simulation engine:
//! - `PriceSeries`, `StrategyParameters`, `TradeOutcome` and trade events
//! - Three single-pass simulators (moving-average crossover, percentage
//!   bands, mean reversion) behind the `Simulator` trait
//! - Injectable event sinks in place of printed trade logs
//! - Price-source and order-sink boundary traits
//! - Random contiguous day-range sampling

pub mod data;
pub mod domain;
pub mod error;
mod rolling;
pub mod sampling;
pub mod sink;
pub mod strategy;

pub use domain::{PriceSeries, StrategyParameters, TradeAction, TradeEvent, TradeOutcome};
pub use error::SimError;
pub use sink::{EventSink, NoopSink, TracingSink};
pub use strategy::{
    advise, BollingerBands, MeanReversion, SimpleMovingAverage, Simulator, StrategyKind,
};
