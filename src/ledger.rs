//! Fungible balance ledger shared by the executor and the vault.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{AccountId, BaseUnits};
use crate::error::LedgerError;

/// One leg of a settlement: `amount` moves from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Movement {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: BaseUnits,
}

/// Tracks balances of a single fungible asset in base units.
///
/// Every call is atomic: the lock is held for the whole operation, so a
/// reader never observes a debit without its matching credit. Balances are
/// unsigned and all arithmetic is checked, which makes the conservation
/// invariant (sum of balances == total minted) structural.
pub struct AssetLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    balances: HashMap<AccountId, BaseUnits>,
    total_supply: BaseUnits,
}

impl AssetLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Create base units out of thin air and credit them to `account`.
    pub fn mint(&self, account: &AccountId, amount: BaseUnits) -> Result<(), LedgerError> {
        let mut state = self.inner.write();
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { amount })?;

        state.total_supply = supply;
        *state.balances.entry(account.clone()).or_insert(0) += amount;

        debug!(account = %account, amount, "minted");
        Ok(())
    }

    /// Move `amount` from one account to another.
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: BaseUnits,
    ) -> Result<(), LedgerError> {
        let mut state = self.inner.write();
        state.debit(from, amount)?;
        state.credit(to, amount);
        Ok(())
    }

    /// Apply two movements as one atomic settlement.
    ///
    /// The debits are validated against the pre-settlement balances before
    /// either leg is applied, so a failing second leg leaves the ledger
    /// untouched. This is what makes a multi-leg trade all-or-nothing.
    pub fn settle(&self, first: &Movement, second: &Movement) -> Result<(), LedgerError> {
        self.settle_batch(&[first.clone(), second.clone()])
    }

    /// Apply any number of movements as one atomic settlement.
    ///
    /// Legs are staged in order against a scratch view of the affected
    /// balances - a later debit may spend an earlier credit - and nothing
    /// is committed unless every leg clears. A rebalance draining several
    /// sources goes through here so a short account reverts the whole
    /// batch.
    pub fn settle_batch(&self, movements: &[Movement]) -> Result<(), LedgerError> {
        let mut state = self.inner.write();

        let mut staged: HashMap<AccountId, BaseUnits> = HashMap::new();
        for movement in movements {
            let have = *staged
                .entry(movement.from.clone())
                .or_insert_with(|| state.balance(&movement.from));
            if have < movement.amount {
                return Err(LedgerError::InsufficientBalance {
                    account: movement.from.clone(),
                    have,
                    need: movement.amount,
                });
            }
            staged.insert(movement.from.clone(), have - movement.amount);

            let to = staged
                .entry(movement.to.clone())
                .or_insert_with(|| state.balance(&movement.to));
            *to += movement.amount;
        }

        for (account, balance) in staged {
            state.balances.insert(account, balance);
        }
        Ok(())
    }

    /// Balance of one account; unknown accounts hold zero.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> BaseUnits {
        self.inner.read().balance(account)
    }

    /// Total base units ever minted.
    #[must_use]
    pub fn total_supply(&self) -> BaseUnits {
        self.inner.read().total_supply
    }

    /// Snapshot of all balances, for the status-reporting layer.
    #[must_use]
    pub fn balances(&self) -> HashMap<AccountId, BaseUnits> {
        self.inner.read().balances.clone()
    }
}

impl Default for AssetLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerState {
    fn balance(&self, account: &AccountId) -> BaseUnits {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn debit(&mut self, account: &AccountId, amount: BaseUnits) -> Result<(), LedgerError> {
        let have = self.balance(account);
        let remaining = have
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: account.clone(),
                have,
                need: amount,
            })?;
        self.balances.insert(account.clone(), remaining);
        Ok(())
    }

    fn credit(&mut self, account: &AccountId, amount: BaseUnits) {
        *self.balances.entry(account.clone()).or_insert(0) += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    #[test]
    fn mint_credits_and_grows_supply() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("alice"), 100).unwrap();

        assert_eq!(ledger.balance_of(&acct("alice")), 100);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn transfer_moves_balance() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("alice"), 100).unwrap();
        ledger.transfer(&acct("alice"), &acct("bob"), 40).unwrap();

        assert_eq!(ledger.balance_of(&acct("alice")), 60);
        assert_eq!(ledger.balance_of(&acct("bob")), 40);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("alice"), 10).unwrap();

        let err = ledger.transfer(&acct("alice"), &acct("bob"), 11).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: acct("alice"),
                have: 10,
                need: 11,
            }
        );
        assert_eq!(ledger.balance_of(&acct("alice")), 10);
        assert_eq!(ledger.balance_of(&acct("bob")), 0);
    }

    #[test]
    fn unknown_account_holds_zero() {
        let ledger = AssetLedger::new();
        assert_eq!(ledger.balance_of(&acct("nobody")), 0);
    }

    #[test]
    fn settle_applies_both_legs() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("executor"), 100).unwrap();
        ledger.mint(&acct("venue-b"), 500).unwrap();

        ledger
            .settle(
                &Movement {
                    from: acct("executor"),
                    to: acct("venue-a"),
                    amount: 100,
                },
                &Movement {
                    from: acct("venue-b"),
                    to: acct("executor"),
                    amount: 110,
                },
            )
            .unwrap();

        assert_eq!(ledger.balance_of(&acct("executor")), 110);
        assert_eq!(ledger.balance_of(&acct("venue-a")), 100);
        assert_eq!(ledger.balance_of(&acct("venue-b")), 390);
        assert_eq!(ledger.total_supply(), 600);
    }

    #[test]
    fn settle_failing_second_leg_touches_nothing() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("executor"), 100).unwrap();
        ledger.mint(&acct("venue-b"), 50).unwrap();

        let err = ledger
            .settle(
                &Movement {
                    from: acct("executor"),
                    to: acct("venue-a"),
                    amount: 100,
                },
                &Movement {
                    from: acct("venue-b"),
                    to: acct("executor"),
                    amount: 110,
                },
            )
            .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance_of(&acct("executor")), 100);
        assert_eq!(ledger.balance_of(&acct("venue-a")), 0);
        assert_eq!(ledger.balance_of(&acct("venue-b")), 50);
    }

    #[test]
    fn settle_second_leg_may_spend_first_credit() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("executor"), 100).unwrap();

        // venue starts empty but receives 100 on the first leg and pays 90 back.
        ledger
            .settle(
                &Movement {
                    from: acct("executor"),
                    to: acct("venue"),
                    amount: 100,
                },
                &Movement {
                    from: acct("venue"),
                    to: acct("executor"),
                    amount: 90,
                },
            )
            .unwrap();

        assert_eq!(ledger.balance_of(&acct("executor")), 90);
        assert_eq!(ledger.balance_of(&acct("venue")), 10);
    }

    #[test]
    fn settle_batch_rejecting_any_leg_commits_none() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("s0"), 100).unwrap();
        ledger.mint(&acct("s1"), 20).unwrap();

        let err = ledger
            .settle_batch(&[
                Movement {
                    from: acct("s0"),
                    to: acct("best"),
                    amount: 100,
                },
                Movement {
                    from: acct("s1"),
                    to: acct("best"),
                    amount: 100,
                },
            ])
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: acct("s1"),
                have: 20,
                need: 100,
            }
        );
        assert_eq!(ledger.balance_of(&acct("s0")), 100);
        assert_eq!(ledger.balance_of(&acct("s1")), 20);
        assert_eq!(ledger.balance_of(&acct("best")), 0);
    }

    #[test]
    fn settle_batch_later_leg_spends_earlier_credit() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("a"), 50).unwrap();

        ledger
            .settle_batch(&[
                Movement {
                    from: acct("a"),
                    to: acct("b"),
                    amount: 50,
                },
                Movement {
                    from: acct("b"),
                    to: acct("c"),
                    amount: 30,
                },
            ])
            .unwrap();

        assert_eq!(ledger.balance_of(&acct("a")), 0);
        assert_eq!(ledger.balance_of(&acct("b")), 20);
        assert_eq!(ledger.balance_of(&acct("c")), 30);
    }

    #[test]
    fn conservation_holds_across_operations() {
        let ledger = AssetLedger::new();
        ledger.mint(&acct("a"), 1_000).unwrap();
        ledger.mint(&acct("b"), 500).unwrap();
        ledger.transfer(&acct("a"), &acct("c"), 250).unwrap();
        ledger.transfer(&acct("b"), &acct("a"), 125).unwrap();

        let sum: BaseUnits = ledger.balances().values().sum();
        assert_eq!(sum, ledger.total_supply());
    }
}
