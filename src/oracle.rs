//! Price oracle with trusted reporters and staleness guarantees.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Duration;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::config::OracleConfig;
use crate::domain::{
    AccountId, ArbitrageGap, Bps, Clock, MarketKey, PriceReport, MAX_PRICE_BPS,
};
use crate::error::OracleError;

/// Default staleness window: five minutes.
pub const DEFAULT_STALE_WINDOW_SECS: i64 = 300;

/// Accepts price reports from trusted reporters and serves gap queries.
///
/// Reports are keyed by (market key, reporting target account); a new report
/// for the same key supersedes the prior one. Freshness is only enforced by
/// [`PriceOracle::get_fresh_price`] - gap computation deliberately reads
/// whatever is stored, and callers needing freshness check it first.
pub struct PriceOracle {
    owner: AccountId,
    clock: Arc<dyn Clock>,
    state: RwLock<OracleState>,
}

struct OracleState {
    trusted: HashSet<AccountId>,
    reports: HashMap<(MarketKey, AccountId), PriceReport>,
    stale_window: Duration,
}

impl PriceOracle {
    /// Create an oracle owned by `owner`, reading time from `clock`.
    #[must_use]
    pub fn new(owner: AccountId, clock: Arc<dyn Clock>) -> Self {
        Self {
            owner,
            clock,
            state: RwLock::new(OracleState {
                trusted: HashSet::new(),
                reports: HashMap::new(),
                stale_window: Duration::seconds(DEFAULT_STALE_WINDOW_SECS),
            }),
        }
    }

    /// Create an oracle with the stale window taken from configuration.
    #[must_use]
    pub fn from_config(owner: AccountId, clock: Arc<dyn Clock>, config: &OracleConfig) -> Self {
        let oracle = Self::new(owner, clock);
        oracle.state.write().stale_window = Duration::seconds(config.stale_window_secs);
        oracle
    }

    /// Grant or revoke reporter trust. Owner-only, idempotent.
    pub fn set_trusted_reporter(
        &self,
        caller: &AccountId,
        reporter: &AccountId,
        trusted: bool,
    ) -> Result<(), OracleError> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        if trusted {
            state.trusted.insert(reporter.clone());
        } else {
            state.trusted.remove(reporter);
        }

        info!(reporter = %reporter, trusted, "reporter trust updated");
        Ok(())
    }

    /// Store a price report, superseding any prior report for the same
    /// (market key, account) pair.
    pub fn report_price(
        &self,
        caller: &AccountId,
        market_key: &MarketKey,
        account: &AccountId,
        yes_price_bps: Bps,
        no_price_bps: Bps,
    ) -> Result<(), OracleError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        if !state.trusted.contains(caller) {
            warn!(caller = %caller, "untrusted reporter rejected");
            return Err(OracleError::Unauthorized {
                caller: caller.clone(),
            });
        }

        if yes_price_bps > MAX_PRICE_BPS {
            return Err(OracleError::InvalidPrice {
                side: "yes",
                price_bps: yes_price_bps,
            });
        }
        if no_price_bps > MAX_PRICE_BPS {
            return Err(OracleError::InvalidPrice {
                side: "no",
                price_bps: no_price_bps,
            });
        }

        state.reports.insert(
            (market_key.clone(), account.clone()),
            PriceReport::new(yes_price_bps, no_price_bps, now),
        );

        info!(
            market_key = %market_key,
            account = %account,
            yes_price_bps,
            no_price_bps,
            "price reported"
        );
        Ok(())
    }

    /// Set the staleness window. Owner-only; must be positive.
    pub fn set_stale_window(
        &self,
        caller: &AccountId,
        window: Duration,
    ) -> Result<(), OracleError> {
        self.require_owner(caller)?;
        if window <= Duration::zero() {
            return Err(OracleError::InvalidWindow);
        }

        self.state.write().stale_window = window;
        info!(window_secs = window.num_seconds(), "stale window updated");
        Ok(())
    }

    /// Return the stored report if it is within the staleness window.
    pub fn get_fresh_price(
        &self,
        market_key: &MarketKey,
        account: &AccountId,
    ) -> Result<PriceReport, OracleError> {
        let now = self.clock.now();
        let state = self.state.read();
        let report = state.report(market_key, account)?;

        let age = now - report.reported_at();
        if age > state.stale_window {
            return Err(OracleError::StalePrice {
                market_key: market_key.clone(),
                account: account.clone(),
                age_secs: age.num_seconds(),
                window_secs: state.stale_window.num_seconds(),
            });
        }

        Ok(report.clone())
    }

    /// Gap between two accounts' latest reports under one market key,
    /// first minus second. Staleness is not enforced here.
    pub fn get_arbitrage_gap(
        &self,
        market_key: &MarketKey,
        account_x: &AccountId,
        account_y: &AccountId,
    ) -> Result<ArbitrageGap, OracleError> {
        let state = self.state.read();
        let x = state.report(market_key, account_x)?;
        let y = state.report(market_key, account_y)?;
        Ok(ArbitrageGap::between(x, y))
    }

    /// Whether `account` is currently a trusted reporter.
    #[must_use]
    pub fn is_trusted(&self, account: &AccountId) -> bool {
        self.state.read().trusted.contains(account)
    }

    /// Current staleness window.
    #[must_use]
    pub fn stale_window(&self) -> Duration {
        self.state.read().stale_window
    }

    /// Latest stored report for a key, regardless of freshness.
    #[must_use]
    pub fn report(&self, market_key: &MarketKey, account: &AccountId) -> Option<PriceReport> {
        self.state
            .read()
            .reports
            .get(&(market_key.clone(), account.clone()))
            .cloned()
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), OracleError> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(OracleError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }
}

impl OracleState {
    fn report(
        &self,
        market_key: &MarketKey,
        account: &AccountId,
    ) -> Result<&PriceReport, OracleError> {
        self.reports
            .get(&(market_key.clone(), account.clone()))
            .ok_or_else(|| OracleError::NotFound {
                market_key: market_key.clone(),
                account: account.clone(),
            })
    }
}
