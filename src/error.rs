use thiserror::Error;

use crate::domain::{AccountId, BaseUnits, Bps, MarketKey};

/// Ledger errors with structured variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance for {account}: have {have}, need {need}")]
    InsufficientBalance {
        account: AccountId,
        have: BaseUnits,
        need: BaseUnits,
    },

    #[error("supply overflow minting {amount} base units")]
    SupplyOverflow { amount: BaseUnits },
}

/// Oracle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: AccountId },

    #[error("invalid price {price_bps} bps for {side} side (max 10000)")]
    InvalidPrice { side: &'static str, price_bps: Bps },

    #[error("stale window must be positive")]
    InvalidWindow,

    #[error("no report for market {market_key} account {account}")]
    NotFound {
        market_key: MarketKey,
        account: AccountId,
    },

    #[error("stale price for market {market_key} account {account}: {age_secs}s old, window {window_secs}s")]
    StalePrice {
        market_key: MarketKey,
        account: AccountId,
        age_secs: i64,
        window_secs: i64,
    },
}

/// Executor guard and settlement errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("caller is not the owner: {caller}")]
    NotOwner { caller: AccountId },

    #[error("executor is paused")]
    Paused,

    #[error("market not approved: {account}")]
    MarketNotApproved { account: AccountId },

    #[error("amount in must be positive")]
    InvalidAmount,

    #[error("insufficient profit: net {net} below minimum {min}")]
    InsufficientProfit { net: i128, min: BaseUnits },

    #[error("counterparty rejected quote: {reason}")]
    QuoteRejected { reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Vault errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: AccountId },

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("insufficient shares: have {have}, need {need}")]
    InsufficientShares { have: u64, need: u64 },

    #[error("insufficient liquidity: unallocated {unallocated}, need {need}")]
    InsufficientLiquidity {
        unallocated: BaseUnits,
        need: BaseUnits,
    },

    #[error("source index {index} out of range ({len} sources)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("insufficient unallocated balance: have {have}, need {need}")]
    InsufficientUnallocated {
        have: BaseUnits,
        need: BaseUnits,
    },

    #[error("no active yield source")]
    NoActiveSource,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
