//! Exchange-agnostic domain types for the accounting core.

mod clock;
mod ids;
mod money;
mod report;
mod source;
mod trade;

// Core domain types
pub use clock::{Clock, SystemClock};
pub use ids::{AccountId, MarketKey};
pub use money::{BaseUnits, Bps, GapBps, MAX_PRICE_BPS};
pub use report::{ArbitrageGap, PriceReport};
pub use source::YieldSource;
pub use trade::{Side, TradeInstruction, TradeStats};
