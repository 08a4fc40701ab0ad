//! Yield source records.

use serde::Serialize;

use super::ids::AccountId;
use super::money::{BaseUnits, Bps};

/// An external capital destination with a reported annual yield rate.
///
/// Sources live in an append-only arena: the index assigned at creation is
/// stable for the vault's lifetime, and retirement happens by clearing the
/// `active` flag, never by removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YieldSource {
    address: AccountId,
    apy_bps: Bps,
    active: bool,
    allocated: BaseUnits,
}

impl YieldSource {
    /// Create a new source with nothing allocated yet.
    #[must_use]
    pub fn new(address: AccountId, apy_bps: Bps, active: bool) -> Self {
        Self {
            address,
            apy_bps,
            active,
            allocated: 0,
        }
    }

    /// Ledger account funds are parked at when allocated here.
    #[must_use]
    pub fn address(&self) -> &AccountId {
        &self.address
    }

    /// Reported annual yield in basis points.
    #[must_use]
    pub fn apy_bps(&self) -> Bps {
        self.apy_bps
    }

    /// Whether the source may receive allocations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Base units currently allocated to this source.
    #[must_use]
    pub fn allocated(&self) -> BaseUnits {
        self.allocated
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn add_allocation(&mut self, amount: BaseUnits) {
        self.allocated += amount;
    }

    /// Clear the allocation, returning the amount freed.
    pub(crate) fn drain_allocation(&mut self) -> BaseUnits {
        std::mem::take(&mut self.allocated)
    }
}
