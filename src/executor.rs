//! Guarded two-leg arbitrage execution.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::ExecutorConfig;
use crate::domain::{AccountId, BaseUnits, Side, TradeInstruction, TradeStats};
use crate::error::ExecutorError;
use crate::ledger::{AssetLedger, Movement};

/// A venue the executor can route a leg through.
///
/// Quotes are pure: they compute what a leg would return without moving any
/// funds. The executor settles both legs on the ledger only after the
/// profit guard has passed, so a rejected instruction never touches a
/// balance.
pub trait Counterparty: Send + Sync {
    /// Ledger account that custodies this venue's liquidity.
    fn account(&self) -> &AccountId;

    /// Position size obtained by committing `amount_in` base units to
    /// `side` of `market_id`.
    fn quote_open(
        &self,
        market_id: u64,
        side: Side,
        amount_in: BaseUnits,
    ) -> Result<BaseUnits, ExecutorError>;

    /// Base units returned by closing `position` on `side` of `market_id`.
    fn quote_close(
        &self,
        market_id: u64,
        side: Side,
        position: BaseUnits,
    ) -> Result<BaseUnits, ExecutorError>;
}

/// Executes owner-approved arbitrage instructions against the ledger.
///
/// Each call to [`ArbExecutor::execute_arbitrage`] is atomic and serialized
/// per instance: a second instruction cannot observe mid-flight balances.
pub struct ArbExecutor {
    owner: AccountId,
    account: AccountId,
    ledger: Arc<AssetLedger>,
    // Standing profit floor; instructions may only raise it.
    min_profit_floor: BaseUnits,
    state: RwLock<ExecState>,
    // Serializes execute_arbitrage per instance.
    exec_gate: Mutex<()>,
}

#[derive(Default)]
struct ExecState {
    approved: HashSet<AccountId>,
    paused: bool,
    stats: TradeStats,
}

impl ArbExecutor {
    /// Create an executor. `account` is the ledger account holding its
    /// trading capital.
    #[must_use]
    pub fn new(owner: AccountId, account: AccountId, ledger: Arc<AssetLedger>) -> Self {
        Self {
            owner,
            account,
            ledger,
            min_profit_floor: 0,
            state: RwLock::new(ExecState::default()),
            exec_gate: Mutex::new(()),
        }
    }

    /// Create an executor honoring the configured profit floor and
    /// startup pause state.
    #[must_use]
    pub fn from_config(
        owner: AccountId,
        account: AccountId,
        ledger: Arc<AssetLedger>,
        config: &ExecutorConfig,
    ) -> Self {
        Self {
            owner,
            account,
            ledger,
            min_profit_floor: config.min_profit,
            state: RwLock::new(ExecState {
                paused: config.start_paused,
                ..ExecState::default()
            }),
            exec_gate: Mutex::new(()),
        }
    }

    /// Approve or revoke a counterparty. Owner-only, idempotent.
    pub fn set_approved_market(
        &self,
        caller: &AccountId,
        counterparty: &AccountId,
        approved: bool,
    ) -> Result<(), ExecutorError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        if approved {
            state.approved.insert(counterparty.clone());
        } else {
            state.approved.remove(counterparty);
        }

        info!(counterparty = %counterparty, approved, "market approval updated");
        Ok(())
    }

    /// Halt execution. Owner-only, idempotent.
    pub fn pause(&self, caller: &AccountId) -> Result<(), ExecutorError> {
        self.require_owner(caller)?;
        self.state.write().paused = true;
        warn!("executor paused");
        Ok(())
    }

    /// Resume execution. Owner-only, idempotent.
    pub fn unpause(&self, caller: &AccountId) -> Result<(), ExecutorError> {
        self.require_owner(caller)?;
        self.state.write().paused = false;
        info!("executor unpaused");
        Ok(())
    }

    /// Execute a two-leg arbitrage instruction, returning realized profit.
    ///
    /// Guard order: ownership, pause flag, counterparty approval, amount,
    /// then the profit floor - computed from both quoted legs before any
    /// balance moves. The instruction's minimum and the configured standing
    /// floor combine; the higher one applies. On success the opening leg
    /// pays `amount_in` to the
    /// first venue and the closing leg collects the gross return from the
    /// second, as one atomic ledger settlement.
    pub fn execute_arbitrage(
        &self,
        caller: &AccountId,
        instruction: &TradeInstruction,
        venue_a: &dyn Counterparty,
        venue_b: &dyn Counterparty,
    ) -> Result<BaseUnits, ExecutorError> {
        let _guard = self.exec_gate.lock();

        self.require_owner(caller)?;

        {
            let state = self.state.read();
            if state.paused {
                return Err(ExecutorError::Paused);
            }
            for venue in [venue_a.account(), venue_b.account()] {
                if !state.approved.contains(venue) {
                    warn!(counterparty = %venue, "unapproved market rejected");
                    return Err(ExecutorError::MarketNotApproved {
                        account: venue.clone(),
                    });
                }
            }
        }

        if instruction.amount_in == 0 {
            return Err(ExecutorError::InvalidAmount);
        }

        // Both legs are quoted before anything settles.
        let open_side = instruction.open_side();
        let position =
            venue_a.quote_open(instruction.market_id_a, open_side, instruction.amount_in)?;
        let gross =
            venue_b.quote_close(instruction.market_id_b, open_side.opposite(), position)?;

        let net = i128::from(gross) - i128::from(instruction.amount_in);
        let min_profit = instruction.min_profit.max(self.min_profit_floor);
        if net < i128::from(min_profit) {
            return Err(ExecutorError::InsufficientProfit { net, min: min_profit });
        }

        self.ledger.settle(
            &Movement {
                from: self.account.clone(),
                to: venue_a.account().clone(),
                amount: instruction.amount_in,
            },
            &Movement {
                from: venue_b.account().clone(),
                to: self.account.clone(),
                amount: gross,
            },
        )?;

        // net >= min_profit >= 0 here, so the cast is exact.
        let profit = net as BaseUnits;
        self.state.write().stats.record(profit);

        info!(
            market_id_a = instruction.market_id_a,
            market_id_b = instruction.market_id_b,
            amount_in = instruction.amount_in,
            profit,
            "arbitrage executed"
        );
        Ok(profit)
    }

    /// Cumulative trade statistics.
    #[must_use]
    pub fn stats(&self) -> TradeStats {
        self.state.read().stats
    }

    /// Whether execution is currently halted.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    /// Whether a counterparty is approved.
    #[must_use]
    pub fn is_approved(&self, counterparty: &AccountId) -> bool {
        self.state.read().approved.contains(counterparty)
    }

    /// Ledger account holding the executor's capital.
    #[must_use]
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), ExecutorError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(ExecutorError::NotOwner {
                caller: caller.clone(),
            })
        }
    }
}
