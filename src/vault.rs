//! Share-accounted vault allocating depositor capital across yield sources.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::VaultConfig;
use crate::domain::{AccountId, BaseUnits, Bps, YieldSource};
use crate::error::VaultError;
use crate::ledger::{AssetLedger, Movement};

/// Serializable aggregate for the polling status layer.
#[derive(Debug, Clone, Serialize)]
pub struct VaultSnapshot {
    pub total_assets: BaseUnits,
    pub unallocated: BaseUnits,
    pub total_shares: u64,
    pub sources: Vec<YieldSource>,
}

/// Custodies depositor funds against proportional share claims.
///
/// Unallocated capital sits in the vault's own ledger account; allocated
/// capital is parked at source accounts but stays part of
/// [`YieldVault::total_assets`], the denominator of all share math. The
/// first deposit mints shares 1:1; later deposits mint in proportion to the
/// pre-deposit asset total.
pub struct YieldVault {
    owner: AccountId,
    account: AccountId,
    ledger: Arc<AssetLedger>,
    // APY improvement required before advising a rotation.
    rotation_threshold_bps: Bps,
    state: RwLock<VaultState>,
}

#[derive(Default)]
struct VaultState {
    shares: HashMap<AccountId, u64>,
    total_shares: u64,
    sources: Vec<YieldSource>,
}

impl YieldVault {
    /// Create a vault. `account` is the ledger account holding unallocated
    /// capital.
    #[must_use]
    pub fn new(owner: AccountId, account: AccountId, ledger: Arc<AssetLedger>) -> Self {
        Self::from_config(owner, account, ledger, &VaultConfig::default())
    }

    /// Create a vault with the rotation threshold taken from configuration.
    #[must_use]
    pub fn from_config(
        owner: AccountId,
        account: AccountId,
        ledger: Arc<AssetLedger>,
        config: &VaultConfig,
    ) -> Self {
        Self {
            owner,
            account,
            ledger,
            rotation_threshold_bps: config.rotation_threshold_bps,
            state: RwLock::new(VaultState::default()),
        }
    }

    /// Deposit `amount` base units, minting proportional shares.
    pub fn deposit(&self, caller: &AccountId, amount: BaseUnits) -> Result<u64, VaultError> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let mut state = self.state.write();

        // Share math uses the pre-deposit totals; validated before funds move.
        let minted = if state.total_shares == 0 {
            amount
        } else {
            let total_assets = self.total_assets_locked(&state);
            let minted = u128::from(amount) * u128::from(state.total_shares)
                / u128::from(total_assets);
            u64::try_from(minted).map_err(|_| VaultError::InvalidAmount)?
        };
        // A deposit too small to mint a share would transfer funds against
        // no claim; reject it like a zero-share withdrawal.
        if minted == 0 {
            return Err(VaultError::InvalidAmount);
        }

        self.ledger.transfer(caller, &self.account, amount)?;

        *state.shares.entry(caller.clone()).or_insert(0) += minted;
        state.total_shares += minted;

        info!(depositor = %caller, amount, minted, "deposit");
        Ok(minted)
    }

    /// Burn `share_amount` shares for a proportional slice of vault assets.
    ///
    /// Only the unallocated balance can pay out; freeing allocated capital
    /// is the owner's job via allocation and rebalancing, never an implicit
    /// side effect of withdrawal.
    pub fn withdraw(
        &self,
        caller: &AccountId,
        share_amount: u64,
    ) -> Result<BaseUnits, VaultError> {
        let mut state = self.state.write();

        let held = state.shares.get(caller).copied().unwrap_or(0);
        if share_amount > held {
            return Err(VaultError::InsufficientShares {
                have: held,
                need: share_amount,
            });
        }
        if share_amount == 0 {
            return Err(VaultError::InvalidAmount);
        }

        let total_assets = self.total_assets_locked(&state);
        let entitlement = u128::from(share_amount) * u128::from(total_assets)
            / u128::from(state.total_shares);
        let entitlement =
            BaseUnits::try_from(entitlement).map_err(|_| VaultError::InvalidAmount)?;

        let unallocated = self.ledger.balance_of(&self.account);
        if entitlement > unallocated {
            warn!(
                depositor = %caller,
                entitlement,
                unallocated,
                "withdrawal exceeds unallocated liquidity"
            );
            return Err(VaultError::InsufficientLiquidity {
                unallocated,
                need: entitlement,
            });
        }

        self.ledger.transfer(&self.account, caller, entitlement)?;

        state.shares.insert(caller.clone(), held - share_amount);
        state.total_shares -= share_amount;

        info!(depositor = %caller, share_amount, entitlement, "withdrawal");
        Ok(entitlement)
    }

    /// Append a yield source to the arena. Owner-only; the assigned index
    /// is stable for the vault's lifetime.
    pub fn add_yield_source(
        &self,
        caller: &AccountId,
        address: AccountId,
        apy_bps: Bps,
        active: bool,
    ) -> Result<usize, VaultError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        let index = state.sources.len();
        state
            .sources
            .push(YieldSource::new(address.clone(), apy_bps, active));

        info!(index, address = %address, apy_bps, active, "yield source added");
        Ok(index)
    }

    /// Activate or retire a source in place. Owner-only; allocation is
    /// untouched.
    pub fn set_source_active(
        &self,
        caller: &AccountId,
        index: usize,
        active: bool,
    ) -> Result<(), VaultError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        let len = state.sources.len();
        let source = state
            .sources
            .get_mut(index)
            .ok_or(VaultError::IndexOutOfRange { index, len })?;
        source.set_active(active);

        info!(index, active, "yield source toggled");
        Ok(())
    }

    /// Move `amount` from unallocated capital to `sources[index]`.
    /// Owner-only.
    pub fn allocate_to_source(
        &self,
        caller: &AccountId,
        index: usize,
        amount: BaseUnits,
    ) -> Result<(), VaultError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        let len = state.sources.len();
        if index >= len {
            return Err(VaultError::IndexOutOfRange { index, len });
        }

        let unallocated = self.ledger.balance_of(&self.account);
        if amount > unallocated {
            return Err(VaultError::InsufficientUnallocated {
                have: unallocated,
                need: amount,
            });
        }

        let address = state.sources[index].address().clone();
        self.ledger.transfer(&self.account, &address, amount)?;
        state.sources[index].add_allocation(amount);

        info!(index, amount, "allocated to source");
        Ok(())
    }

    /// Concentrate allocated capital into the highest-yield active source.
    ///
    /// The winner is the active source with the highest APY, earliest index
    /// on ties. Every other source's allocation is drained into it;
    /// unallocated capital stays put so withdrawals keep their liquidity
    /// (see the concrete rebalancing scenario in the vault tests).
    /// Idempotent: a second call with no intervening changes moves nothing.
    pub fn rebalance_to_optimal(&self, caller: &AccountId) -> Result<(), VaultError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();

        let best = Self::best_active(&state.sources).ok_or(VaultError::NoActiveSource)?;
        let best_address = state.sources[best].address().clone();

        // Stage every drain as one ledger batch; a single short source
        // account reverts the whole rebalance with allocations untouched.
        let mut drained: Vec<usize> = Vec::new();
        let mut movements: Vec<Movement> = Vec::new();
        for (index, source) in state.sources.iter().enumerate() {
            if index == best || source.allocated() == 0 {
                continue;
            }
            drained.push(index);
            movements.push(Movement {
                from: source.address().clone(),
                to: best_address.clone(),
                amount: source.allocated(),
            });
        }

        if movements.is_empty() {
            return Ok(());
        }
        self.ledger.settle_batch(&movements)?;

        let mut moved: BaseUnits = 0;
        for index in drained {
            let freed = state.sources[index].drain_allocation();
            state.sources[best].add_allocation(freed);
            moved += freed;
        }

        info!(best, moved, "rebalanced to optimal source");
        Ok(())
    }

    /// Whether the best active source beats the APY of the source holding
    /// the largest allocation by more than the configured threshold.
    ///
    /// Advisory only: operators still trigger the rebalance explicitly.
    /// With nothing allocated the comparison baseline is 0 bps.
    #[must_use]
    pub fn rotation_advised(&self) -> bool {
        let state = self.state.read();
        let Some(best) = Self::best_active(&state.sources) else {
            return false;
        };
        let current_apy = state
            .sources
            .iter()
            .filter(|source| source.allocated() > 0)
            .max_by_key(|source| source.allocated())
            .map_or(0, YieldSource::apy_bps);
        u64::from(state.sources[best].apy_bps())
            > u64::from(current_apy) + u64::from(self.rotation_threshold_bps)
    }

    /// Active source with the highest APY, earliest index on ties.
    fn best_active(sources: &[YieldSource]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, source) in sources.iter().enumerate() {
            if !source.is_active() {
                continue;
            }
            // Strict comparison keeps the earliest index on ties.
            match best {
                Some(current) if source.apy_bps() <= sources[current].apy_bps() => {}
                _ => best = Some(index),
            }
        }
        best
    }

    /// Unallocated capital plus everything parked at sources.
    #[must_use]
    pub fn total_assets(&self) -> BaseUnits {
        self.total_assets_locked(&self.state.read())
    }

    /// Capital sitting in the vault account, available for withdrawal.
    #[must_use]
    pub fn unallocated(&self) -> BaseUnits {
        self.ledger.balance_of(&self.account)
    }

    /// Shares held by one depositor.
    #[must_use]
    pub fn shares_of(&self, account: &AccountId) -> u64 {
        self.state.read().shares.get(account).copied().unwrap_or(0)
    }

    /// Total outstanding shares.
    #[must_use]
    pub fn total_shares(&self) -> u64 {
        self.state.read().total_shares
    }

    /// Snapshot of the source arena.
    #[must_use]
    pub fn sources(&self) -> Vec<YieldSource> {
        self.state.read().sources.clone()
    }

    /// Consistent aggregate snapshot for the status layer.
    #[must_use]
    pub fn snapshot(&self) -> VaultSnapshot {
        let state = self.state.read();
        VaultSnapshot {
            total_assets: self.total_assets_locked(&state),
            unallocated: self.ledger.balance_of(&self.account),
            total_shares: state.total_shares,
            sources: state.sources.clone(),
        }
    }

    fn total_assets_locked(&self, state: &VaultState) -> BaseUnits {
        let allocated: BaseUnits = state.sources.iter().map(YieldSource::allocated).sum();
        self.ledger.balance_of(&self.account) + allocated
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), VaultError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(VaultError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }
}
