//! Opaque string identifiers for accounts and markets.

use std::fmt;

use serde::Serialize;

/// Names a ledger account.
///
/// One type covers owners, depositors, reporters, counterparty venues,
/// and the internal accounts components custody funds under. Keeping the
/// inner string private forces construction through [`AccountId::new`];
/// two ids compare equal exactly when their strings do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Names a market in oracle price reports.
///
/// Reports are keyed by (market, reporter); the key's contents are never
/// parsed, so callers may use slugs, condition ids, or anything stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MarketKey(String);

impl MarketKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MarketKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for MarketKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn account_ids_compare_by_contents() {
        let a = AccountId::new("treasury");
        let b: AccountId = "treasury".into();
        let c = AccountId::from(String::from("reserve"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "treasury");
    }

    #[test]
    fn account_id_usable_as_hash_key() {
        let mut balances: HashMap<AccountId, u64> = HashMap::new();
        balances.insert(AccountId::new("treasury"), 10);
        assert_eq!(balances.get(&AccountId::from("treasury")), Some(&10));
    }

    #[test]
    fn ids_display_their_inner_string() {
        assert_eq!(AccountId::new("alice").to_string(), "alice");
        assert_eq!(MarketKey::new("btc-usd-2024").to_string(), "btc-usd-2024");
    }

    #[test]
    fn market_key_round_trips_through_conversions() {
        let key = MarketKey::from("election-2024");
        assert_eq!(key.as_str(), "election-2024");
        assert_eq!(key, MarketKey::new(String::from("election-2024")));
    }
}
