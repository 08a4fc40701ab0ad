//! Deterministic test doubles: a manual clock and a fixed-fee venue.
//!
//! Available to downstream tests behind the `testkit` feature.

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

use crate::domain::{AccountId, BaseUnits, Bps, Clock, Side};
use crate::error::ExecutorError;
use crate::executor::Counterparty;

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Start at an arbitrary fixed instant.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Payout multiplier applied when closing a position, in basis points.
const DEFAULT_PAYOUT_BPS: Bps = 12_000;

/// A counterparty charging a flat fee per leg.
///
/// Opening converts capital into a position net of the fee; closing pays
/// out at a fixed multiplier, again net of the fee. With the default 1.2x
/// payout a round trip through two 2.5% venues stays comfortably
/// profitable, mirroring the seeded mock venues the original executor
/// traded against.
pub struct FeeMarket {
    account: AccountId,
    fee_bps: Bps,
    payout_bps: Bps,
}

impl FeeMarket {
    /// Create a venue with the given per-leg fee.
    #[must_use]
    pub fn new(account: AccountId, fee_bps: Bps) -> Self {
        Self {
            account,
            fee_bps,
            payout_bps: DEFAULT_PAYOUT_BPS,
        }
    }

    /// Override the close-side payout multiplier.
    #[must_use]
    pub fn with_payout(mut self, payout_bps: Bps) -> Self {
        self.payout_bps = payout_bps;
        self
    }

    fn after_fee(&self, amount: BaseUnits) -> BaseUnits {
        let kept = u128::from(amount) * u128::from(10_000 - self.fee_bps) / 10_000;
        kept as BaseUnits
    }
}

impl Counterparty for FeeMarket {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn quote_open(
        &self,
        _market_id: u64,
        _side: Side,
        amount_in: BaseUnits,
    ) -> Result<BaseUnits, ExecutorError> {
        Ok(self.after_fee(amount_in))
    }

    fn quote_close(
        &self,
        _market_id: u64,
        _side: Side,
        position: BaseUnits,
    ) -> Result<BaseUnits, ExecutorError> {
        let payout = u128::from(position) * u128::from(self.payout_bps) / 10_000;
        Ok(self.after_fee(payout as BaseUnits))
    }
}
