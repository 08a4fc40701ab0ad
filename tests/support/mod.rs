#![allow(dead_code)]

//! Shared harness building a seeded world for integration tests.

use std::sync::Arc;

use arbvault::domain::AccountId;
use arbvault::executor::{ArbExecutor, Counterparty};
use arbvault::ledger::AssetLedger;
use arbvault::oracle::PriceOracle;
use arbvault::testkit::{FeeMarket, ManualClock};
use arbvault::vault::YieldVault;

pub struct World {
    pub ledger: Arc<AssetLedger>,
    pub clock: Arc<ManualClock>,
    pub oracle: PriceOracle,
    pub executor: ArbExecutor,
    pub vault: YieldVault,
    pub owner: AccountId,
    pub reporter: AccountId,
    pub user: AccountId,
}

impl World {
    /// Owner, one trusted reporter, one funded user; executor capital and
    /// component accounts seeded on a fresh ledger.
    pub fn new() -> Self {
        let owner = AccountId::new("owner");
        let reporter = AccountId::new("reporter");
        let user = AccountId::new("user");

        let ledger = Arc::new(AssetLedger::new());
        let clock = Arc::new(ManualClock::default());

        let oracle = PriceOracle::new(owner.clone(), clock.clone());
        oracle
            .set_trusted_reporter(&owner, &reporter, true)
            .unwrap();

        let executor = ArbExecutor::new(owner.clone(), AccountId::new("executor"), ledger.clone());
        let vault = YieldVault::new(owner.clone(), AccountId::new("vault"), ledger.clone());

        ledger.mint(executor.account(), 1_000_000).unwrap();
        ledger.mint(&user, 1_000_000).unwrap();

        Self {
            ledger,
            clock,
            oracle,
            executor,
            vault,
            owner,
            reporter,
            user,
        }
    }

    /// An approved 2.5%-fee venue seeded with liquidity.
    pub fn approved_market(&self, name: &str) -> FeeMarket {
        let market = FeeMarket::new(AccountId::new(name), 250);
        self.ledger.mint(market.account(), 3_000_000).unwrap();
        self.executor
            .set_approved_market(&self.owner, market.account(), true)
            .unwrap();
        market
    }
}

/// Sum of balances must always equal minted supply.
pub fn assert_conservation(ledger: &AssetLedger) {
    let sum: u64 = ledger.balances().values().sum();
    assert_eq!(sum, ledger.total_supply(), "ledger conservation violated");
}
