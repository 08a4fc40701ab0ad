//! Integration tests for the price oracle.

mod support;

use arbvault::domain::{AccountId, MarketKey};
use arbvault::error::OracleError;
use chrono::Duration;
use support::World;

#[test]
fn trusted_reporter_and_gap_query() {
    let world = World::new();
    let key = MarketKey::new("ipl-india-vs-aus");
    let x = AccountId::new("x");
    let y = AccountId::new("y");

    world
        .oracle
        .report_price(&world.reporter, &key, &x, 6_500, 3_500)
        .unwrap();
    world
        .oracle
        .report_price(&world.reporter, &key, &y, 7_200, 2_800)
        .unwrap();

    let gap = world.oracle.get_arbitrage_gap(&key, &x, &y).unwrap();
    assert_eq!(gap.yes_gap, -700);
    assert_eq!(gap.no_gap, 700);

    // Reversing the accounts flips the signs.
    let gap = world.oracle.get_arbitrage_gap(&key, &y, &x).unwrap();
    assert_eq!(gap.yes_gap, 700);
    assert_eq!(gap.no_gap, -700);
}

#[test]
fn unauthorized_reporter_rejected_without_state_change() {
    let world = World::new();
    let key = MarketKey::new("unauthorized-market");
    let target = AccountId::new("x");

    let err = world
        .oracle
        .report_price(&world.user, &key, &target, 6_500, 3_500)
        .unwrap_err();

    assert!(matches!(err, OracleError::Unauthorized { .. }));
    assert!(world.oracle.report(&key, &target).is_none());
}

#[test]
fn stale_report_rejected_by_fresh_read_only() {
    let world = World::new();
    let key = MarketKey::new("stale-check");
    let x = AccountId::new("x");
    let y = AccountId::new("y");

    world
        .oracle
        .set_stale_window(&world.owner, Duration::seconds(1))
        .unwrap();
    world
        .oracle
        .report_price(&world.reporter, &key, &x, 6_400, 3_600)
        .unwrap();
    world
        .oracle
        .report_price(&world.reporter, &key, &y, 6_100, 3_900)
        .unwrap();

    world.clock.advance(Duration::seconds(2));

    let err = world.oracle.get_fresh_price(&key, &x).unwrap_err();
    assert!(matches!(err, OracleError::StalePrice { .. }));

    // The stale report is still visible to the gap query.
    let gap = world.oracle.get_arbitrage_gap(&key, &x, &y).unwrap();
    assert_eq!(gap.yes_gap, 300);
    assert_eq!(gap.no_gap, -300);
}

#[test]
fn report_within_window_stays_fresh() {
    let world = World::new();
    let key = MarketKey::new("fresh");
    let x = AccountId::new("x");

    world
        .oracle
        .set_stale_window(&world.owner, Duration::seconds(10))
        .unwrap();
    world
        .oracle
        .report_price(&world.reporter, &key, &x, 5_500, 4_500)
        .unwrap();

    world.clock.advance(Duration::seconds(10));

    // Age == window is still fresh; rejection requires strictly older.
    let report = world.oracle.get_fresh_price(&key, &x).unwrap();
    assert_eq!(report.yes_price_bps(), 5_500);

    world.clock.advance(Duration::seconds(1));
    assert!(world.oracle.get_fresh_price(&key, &x).is_err());
}

#[test]
fn boundary_prices_accepted() {
    let world = World::new();
    let key = MarketKey::new("bounds");
    let x = AccountId::new("x");

    world
        .oracle
        .report_price(&world.reporter, &key, &x, 0, 10_000)
        .unwrap();

    let report = world.oracle.get_fresh_price(&key, &x).unwrap();
    assert_eq!(report.yes_price_bps(), 0);
    assert_eq!(report.no_price_bps(), 10_000);
}

#[test]
fn invalid_prices_rejected() {
    let world = World::new();
    let key = MarketKey::new("bad");
    let x = AccountId::new("x");

    assert!(matches!(
        world
            .oracle
            .report_price(&world.reporter, &key, &x, 10_001, 0)
            .unwrap_err(),
        OracleError::InvalidPrice { side: "yes", .. }
    ));
    assert!(matches!(
        world
            .oracle
            .report_price(&world.reporter, &key, &x, 0, 10_001)
            .unwrap_err(),
        OracleError::InvalidPrice { side: "no", .. }
    ));
}

#[test]
fn reports_are_keyed_per_market_and_account() {
    let world = World::new();
    let key_a = MarketKey::new("market-a");
    let key_b = MarketKey::new("market-b");
    let x = AccountId::new("x");

    world
        .oracle
        .report_price(&world.reporter, &key_a, &x, 6_000, 4_000)
        .unwrap();

    assert!(world.oracle.get_fresh_price(&key_a, &x).is_ok());
    assert!(matches!(
        world.oracle.get_fresh_price(&key_b, &x).unwrap_err(),
        OracleError::NotFound { .. }
    ));
}
