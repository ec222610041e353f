//! Boundaries to the outside world: price sources and order sinks.
//!
//! Only the traits and value types live here. Concrete file-backed sources
//! are in the runner; live brokerage integration is out of scope.

pub mod order;
pub mod provider;

pub use order::{
    OrderAck, OrderError, OrderKind, OrderSide, OrderSink, PaperOrderSink, TimeInForce,
    TradeIntent,
};
pub use provider::{BarGranularity, DataError, PriceSource};
