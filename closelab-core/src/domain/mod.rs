//! Domain types shared by every simulator and the sweep layer.

pub mod event;
pub mod outcome;
pub mod params;
pub mod price_series;

pub use event::{TradeAction, TradeEvent};
pub use outcome::TradeOutcome;
pub use params::StrategyParameters;
pub use price_series::PriceSeries;
