//! Arbvault - on-ledger accounting core for cross-market arbitrage and
//! yield allocation.
//!
//! Three components share one fungible-asset ledger:
//!
//! - **[`oracle::PriceOracle`]** - trusted reporters push yes/no prices in
//!   basis points; readers query arbitrage gaps or staleness-checked prices.
//! - **[`executor::ArbExecutor`]** - executes two-leg arbitrage instructions
//!   against approved counterparties, atomically and with a profit floor.
//! - **[`vault::YieldVault`]** - custodies depositor funds against
//!   proportional shares and concentrates capital into the highest-yield
//!   source on demand.
//!
//! The decision to trade is external: the executor receives instructions,
//! it does not compute them. All conserved values are integers (base units
//! and basis points) and every operation either commits fully or fails
//! without touching state.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with validation
//! - [`domain`] - accounts, prices, trade and source records
//! - [`error`] - error types for the crate
//! - [`ledger`] - the shared balance ledger
//! - [`oracle`] / [`executor`] / [`vault`] - the three components
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use arbvault::domain::AccountId;
//! use arbvault::ledger::AssetLedger;
//! use arbvault::vault::YieldVault;
//!
//! let owner = AccountId::new("owner");
//! let ledger = Arc::new(AssetLedger::new());
//! let vault = YieldVault::new(owner.clone(), AccountId::new("vault"), ledger.clone());
//!
//! ledger.mint(&AccountId::new("alice"), 1_000).unwrap();
//! vault.deposit(&AccountId::new("alice"), 250).unwrap();
//! assert_eq!(vault.total_assets(), 250);
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod oracle;
pub mod vault;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
