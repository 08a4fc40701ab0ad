//! Trade instruction and statistics types for the executor.

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::BaseUnits;

/// Which side of a binary market a leg takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The complementary side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// A two-leg arbitrage instruction.
///
/// Market ids are opaque to the core and passed through to the
/// counterparties unmodified. The decision to trade is made by an external
/// caller; the executor only guards and settles.
#[derive(Debug, Clone)]
pub struct TradeInstruction {
    /// Market identifier understood by the first counterparty.
    pub market_id_a: u64,
    /// Market identifier understood by the second counterparty.
    pub market_id_b: u64,
    /// Capital committed to the opening leg, in base units.
    pub amount_in: BaseUnits,
    /// Whether the opening leg buys the yes side on the first counterparty.
    pub buy_yes_on_a: bool,
    /// Minimum acceptable net profit, in base units.
    pub min_profit: BaseUnits,
}

impl TradeInstruction {
    /// Side taken on the opening leg.
    #[must_use]
    pub fn open_side(&self) -> Side {
        if self.buy_yes_on_a {
            Side::Yes
        } else {
            Side::No
        }
    }
}

/// Cumulative executor statistics, mutated only by successful executions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TradeStats {
    pub total_trades_executed: u64,
    pub total_profit_earned: BaseUnits,
}

impl TradeStats {
    /// Record one successful execution.
    pub fn record(&mut self, profit: BaseUnits) {
        self.total_trades_executed += 1;
        self.total_profit_earned = self.total_profit_earned.saturating_add(profit);
    }

    /// Average profit per executed trade, for display only.
    #[must_use]
    pub fn average_profit(&self) -> Option<Decimal> {
        if self.total_trades_executed == 0 {
            None
        } else {
            Some(Decimal::from(self.total_profit_earned) / Decimal::from(self.total_trades_executed))
        }
    }
}
