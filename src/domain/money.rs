//! Monetary units for balances and prices.
//!
//! All conserved values are integers: balances in indivisible base units,
//! prices and yield rates in basis points. Binary floating point is never
//! used for anything the ledger must conserve.

/// Quantity of the accounted asset, in indivisible base units.
pub type BaseUnits = u64;

/// Price or rate expressed in basis points (1 bps = 0.01%).
pub type Bps = u32;

/// Upper bound for a market price: 10000 bps == 100%.
pub const MAX_PRICE_BPS: Bps = 10_000;

/// Signed gap between two prices, in basis points.
pub type GapBps = i64;
