//! Price report types for the oracle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::money::{Bps, GapBps};

/// A reported yes/no price pair for one account under one market key.
///
/// Reports are superseded in place, never deleted; the timestamp is the
/// oracle clock's reading when the report was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    yes_price_bps: Bps,
    no_price_bps: Bps,
    reported_at: DateTime<Utc>,
}

impl PriceReport {
    /// Create a new report. Prices are validated by the oracle before
    /// construction.
    #[must_use]
    pub fn new(yes_price_bps: Bps, no_price_bps: Bps, reported_at: DateTime<Utc>) -> Self {
        Self {
            yes_price_bps,
            no_price_bps,
            reported_at,
        }
    }

    /// Yes-side price in basis points.
    #[must_use]
    pub fn yes_price_bps(&self) -> Bps {
        self.yes_price_bps
    }

    /// No-side price in basis points.
    #[must_use]
    pub fn no_price_bps(&self) -> Bps {
        self.no_price_bps
    }

    /// When the report was stored.
    #[must_use]
    pub fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }
}

/// Derived gap between two accounts' reported prices for the same market.
///
/// Sign convention: a positive `yes_gap` means the first account's yes-price
/// exceeds the second's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArbitrageGap {
    pub yes_gap: GapBps,
    pub no_gap: GapBps,
}

impl ArbitrageGap {
    /// Compute the gap between two reports, first minus second.
    #[must_use]
    pub fn between(x: &PriceReport, y: &PriceReport) -> Self {
        Self {
            yes_gap: GapBps::from(x.yes_price_bps) - GapBps::from(y.yes_price_bps),
            no_gap: GapBps::from(x.no_price_bps) - GapBps::from(y.no_price_bps),
        }
    }
}
