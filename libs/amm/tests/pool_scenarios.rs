//! End-to-end pool scenarios driven through the public entry points

mod common;

use amm::{
    AccountId, AmmError, Asset, InMemoryTokenLedger, Pool, PoolEvent, PoolSnapshot, TokenLedger, TransferError,
};
use common::{alice, bob, deployer, pool_account, Harness, START_TIME};
use std::sync::Arc;

#[test]
fn test_first_deposit_mints_sqrt_shares() {
    let mut h = Harness::new(30, 60);
    h.fund(alice(), 10_000);

    let shares = h.pool.add_liquidity(alice(), &mut h.ledger, 1000, 1000).unwrap();

    assert_eq!(shares, 1000);
    assert_eq!(h.pool.get_reserves(), (1000, 1000));
    assert_eq!(h.pool.total_shares(), 1000);
    assert_eq!(h.pool.share_balance(&alice()), 1000);
    assert_eq!(h.pool_balances(), (1000, 1000));
    assert_eq!(
        h.events.events(),
        vec![PoolEvent::Deposit {
            provider: alice(),
            amount_x: 1000,
            amount_y: 1000,
            shares: 1000,
        }]
    );
}

#[test]
fn test_swap_x_for_y_reference_case() {
    let mut h = Harness::seeded(1000, 1000);

    let out = h.pool.swap_x_for_y(bob(), &mut h.ledger, 100, 0).unwrap();

    // floor(100 * 9970 * 1000 / (1000 * 10000 + 100 * 9970))
    assert_eq!(out, 90);
    assert_eq!(h.pool.get_reserves(), (1100, 910));
    assert_eq!(h.pool_balances(), (1100, 910));
    assert_eq!(h.ledger.balance_of(Asset::Y, bob()), 10_000 + 90);
    assert_eq!(h.ledger.balance_of(Asset::X, bob()), 10_000 - 100);
}

#[test]
fn test_swap_y_for_x_is_symmetric() {
    let mut h = Harness::seeded(1000, 1000);

    let out = h.pool.swap_y_for_x(bob(), &mut h.ledger, 100, 90).unwrap();

    assert_eq!(out, 90);
    assert_eq!(h.pool.get_reserves(), (910, 1100));
}

#[test]
fn test_swap_emits_sample_then_swap_record() {
    let mut h = Harness::seeded(1000, 1000);
    h.pool.swap_x_for_y(bob(), &mut h.ledger, 100, 0).unwrap();

    let events = h.events.events();
    assert_eq!(
        &events[1..],
        &[
            PoolEvent::TwapSampled {
                price_x: 1100,
                price_y: 910,
                timestamp: START_TIME,
            },
            PoolEvent::Swap {
                trader: bob(),
                direction: amm::Direction::XToY,
                amount_in: 100,
                amount_out: 90,
            },
        ]
    );
}

#[test]
fn test_swap_rejects_zero_input_and_empty_pool() {
    let mut h = Harness::new(30, 60);
    h.fund(bob(), 1000);

    assert_eq!(h.pool.swap_x_for_y(bob(), &mut h.ledger, 0, 0), Err(AmmError::InvalidAmount));
    assert_eq!(h.pool.swap_x_for_y(bob(), &mut h.ledger, 10, 0), Err(AmmError::NoLiquidity));
    assert!(h.events.is_empty());
}

#[test]
fn test_slippage_floor_blocks_swap_without_side_effects() {
    let mut h = Harness::seeded(1000, 1000);
    let before = h.pool.snapshot();

    let err = h.pool.swap_x_for_y(bob(), &mut h.ledger, 100, 91).unwrap_err();

    assert_eq!(
        err,
        AmmError::SlippageExceeded {
            amount_out: 90,
            min_amount_out: 91
        }
    );
    assert_eq!(h.pool.snapshot(), before);
    assert_eq!(h.ledger.balance_of(Asset::X, bob()), 10_000);
    assert_eq!(h.events.count("swap"), 0);
}

#[test]
fn test_swap_with_unfunded_trader_leaves_no_partial_state() {
    let mut h = Harness::seeded(1000, 1000);
    let carol = AccountId::from_u64(0xc0);

    let err = h.pool.swap_x_for_y(carol, &mut h.ledger, 100, 0).unwrap_err();

    assert!(matches!(err, AmmError::Transfer(TransferError::InsufficientBalance { .. })));
    assert_eq!(h.pool.get_reserves(), (1000, 1000));
    assert_eq!(h.pool_balances(), (1000, 1000));
    assert_eq!(h.pool.twap().timestamp, 0);
}

#[test]
fn test_unbalanced_deposit_is_rejected() {
    let mut h = Harness::seeded(1000, 2000);

    let err = h.pool.add_liquidity(bob(), &mut h.ledger, 100, 199).unwrap_err();

    assert!(matches!(err, AmmError::UnbalancedDeposit { .. }));
    assert_eq!(h.pool.get_reserves(), (1000, 2000));
    assert_eq!(h.pool.share_balance(&bob()), 0);
}

#[test]
fn test_dust_deposit_mints_nothing_and_fails() {
    // Each share is worth 1000 units of both assets
    let snapshot = PoolSnapshot {
        reserve_x: 10_000,
        reserve_y: 10_000,
        total_shares: 10,
        balances: vec![(alice(), 10)],
        fee_bps: 30,
        twap_interval_secs: 60,
        twap: Default::default(),
        governors: vec![deployer()],
    };
    let h = Harness::new(30, 60);
    let pool = Pool::restore(snapshot, h.clock.clone(), h.events.clone()).unwrap();
    let mut ledger = h.ledger.clone();
    ledger.mint(Asset::X, bob(), 10_000);
    ledger.mint(Asset::Y, bob(), 10_000);

    assert_eq!(pool.add_liquidity(bob(), &mut ledger, 1, 1), Err(AmmError::ZeroLiquidityMinted));
    assert_eq!(pool.add_liquidity(bob(), &mut ledger, 1000, 1000), Ok(1));
    assert_eq!(ledger.balance_of(Asset::X, bob()), 9_000);
}

#[test]
fn test_deposit_with_missing_y_refunds_x() {
    let mut h = Harness::seeded(1000, 1000);
    let carol = AccountId::from_u64(0xc0);
    h.ledger.mint(Asset::X, carol, 500);

    let err = h.pool.add_liquidity(carol, &mut h.ledger, 500, 500).unwrap_err();

    assert!(matches!(err, AmmError::Transfer(_)));
    assert_eq!(h.ledger.balance_of(Asset::X, carol), 500);
    assert_eq!(h.pool_balances(), (1000, 1000));
    assert_eq!(h.pool.total_shares(), 1000);
}

#[test]
fn test_proportional_round_trip_is_exact_at_unit_share_price() {
    let mut h = Harness::seeded(1000, 1000);

    let shares = h.pool.add_liquidity(bob(), &mut h.ledger, 250, 250).unwrap();
    let (x, y) = h.pool.remove_liquidity(bob(), &mut h.ledger, shares).unwrap();

    assert_eq!((x, y), (250, 250));
    assert_eq!(h.pool.share_balance(&bob()), 0);
    assert_eq!(h.ledger.balance_of(Asset::X, bob()), 10_000);
}

#[test]
fn test_withdraw_everything_empties_pool() {
    let mut h = Harness::seeded(1000, 4000);
    h.pool.swap_x_for_y(bob(), &mut h.ledger, 100, 0).unwrap();

    let reserves = h.pool.get_reserves();
    let (x, y) = h.pool.remove_liquidity(alice(), &mut h.ledger, 2000).unwrap();

    assert_eq!((x, y), reserves);
    assert_eq!(h.pool.get_reserves(), (0, 0));
    assert_eq!(h.pool.total_shares(), 0);
    assert_eq!(h.pool_balances(), (0, 0));

    // An emptied pool accepts a fresh first deposit at any ratio
    let shares = h.pool.add_liquidity(bob(), &mut h.ledger, 10, 1000).unwrap();
    assert_eq!(shares, 100);
}

#[test]
fn test_withdraw_validation() {
    let mut h = Harness::seeded(1000, 1000);

    assert_eq!(
        h.pool.remove_liquidity(alice(), &mut h.ledger, 0),
        Err(AmmError::InvalidShareAmount)
    );
    assert_eq!(
        h.pool.remove_liquidity(bob(), &mut h.ledger, 1),
        Err(AmmError::InsufficientShares {
            requested: 1,
            available: 0
        })
    );
    assert_eq!(
        h.pool.remove_liquidity(alice(), &mut h.ledger, 1001),
        Err(AmmError::InsufficientShares {
            requested: 1001,
            available: 1000
        })
    );
}

/// Ledger whose pushes of one asset always fail
struct FailingPushLedger {
    inner: InMemoryTokenLedger,
    failing: Asset,
}

impl TokenLedger for FailingPushLedger {
    fn pull(&mut self, asset: Asset, from: AccountId, amount: u128) -> Result<(), TransferError> {
        self.inner.pull(asset, from, amount)
    }

    fn push(&mut self, asset: Asset, to: AccountId, amount: u128) -> Result<(), TransferError> {
        if asset == self.failing {
            return Err(TransferError::Rejected {
                asset,
                amount,
                reason: "frozen".to_string(),
            });
        }
        self.inner.push(asset, to, amount)
    }
}

#[test]
fn test_failed_payout_restores_burned_shares() {
    let h = Harness::seeded(1000, 1000);
    let before = h.pool.snapshot();
    let mut ledger = FailingPushLedger {
        inner: h.ledger.clone(),
        failing: Asset::Y,
    };

    let err = h.pool.remove_liquidity(alice(), &mut ledger, 400).unwrap_err();

    assert!(matches!(err, AmmError::Transfer(TransferError::Rejected { .. })));
    assert_eq!(h.pool.snapshot(), before);
    // X payout was clawed back
    assert_eq!(ledger.inner.balance_of(Asset::X, pool_account()), 1000);
    assert_eq!(ledger.inner.balance_of(Asset::X, alice()), 9000);
    assert_eq!(h.events.count("withdrawal"), 0);
}

#[test]
fn test_failed_swap_payout_refunds_input() {
    let h = Harness::seeded(1000, 1000);
    let mut ledger = FailingPushLedger {
        inner: h.ledger.clone(),
        failing: Asset::Y,
    };

    assert!(h.pool.swap_x_for_y(bob(), &mut ledger, 100, 0).is_err());
    assert_eq!(ledger.inner.balance_of(Asset::X, bob()), 10_000);
    assert_eq!(h.pool.get_reserves(), (1000, 1000));
}

#[test]
fn test_non_governor_cannot_set_fee() {
    let h = Harness::new(30, 60);

    assert_eq!(h.pool.set_fee(bob(), 50), Err(AmmError::NotGovernor(bob())));
    assert_eq!(h.pool.fee_bps(), 30);
    assert!(h.events.is_empty());
}

#[test]
fn test_governor_updates_parameters() {
    let mut h = Harness::seeded(1000, 1000);

    h.pool.set_fee(deployer(), 0).unwrap();
    assert_eq!(h.pool.fee_bps(), 0);
    assert_eq!(h.pool.quote(amm::Direction::XToY, 1000).unwrap(), 500);
    assert_eq!(h.pool.set_fee(deployer(), 10_000), Err(AmmError::InvalidFee(10_000)));

    h.pool.set_twap_interval(deployer(), 3600).unwrap();
    assert_eq!(h.pool.twap_interval_secs(), 3600);
    assert_eq!(h.pool.set_twap_interval(alice(), 1), Err(AmmError::NotGovernor(alice())));

    let out = h.pool.swap_x_for_y(bob(), &mut h.ledger, 1000, 0).unwrap();
    assert_eq!(out, 500);
    assert_eq!(h.events.count("fee_updated"), 1);
    assert_eq!(h.events.count("twap_interval_updated"), 1);
}

#[test]
fn test_governor_lifecycle() {
    let h = Harness::new(30, 60);

    h.pool.add_governor(deployer(), alice()).unwrap();
    assert!(h.pool.is_governor(&alice()));
    assert_eq!(h.pool.add_governor(alice(), deployer()), Err(AmmError::GovernorAlreadyExists(deployer())));
    assert_eq!(h.pool.add_governor(alice(), AccountId::ZERO), Err(AmmError::InvalidGovernorAddress));
    assert_eq!(h.pool.add_governor(bob(), bob()), Err(AmmError::NotGovernor(bob())));

    // New governor can remove the deployer
    h.pool.remove_governor(alice(), deployer()).unwrap();
    assert_eq!(h.pool.governors(), vec![alice()]);
    assert_eq!(h.pool.set_fee(deployer(), 5), Err(AmmError::NotGovernor(deployer())));
    assert_eq!(h.pool.remove_governor(alice(), bob()), Err(AmmError::GovernorNotFound(bob())));

    // Removing the last governor is allowed and freezes parameters
    h.pool.remove_governor(alice(), alice()).unwrap();
    assert!(h.pool.governors().is_empty());
    assert_eq!(h.pool.set_fee(alice(), 5), Err(AmmError::NotGovernor(alice())));
    assert_eq!(h.events.count("governor_added"), 1);
    assert_eq!(h.events.count("governor_removed"), 2);
}

#[test]
fn test_twap_samples_only_after_interval() {
    let mut h = Harness::seeded(1_000_000, 1_000_000);

    h.pool.swap_x_for_y(bob(), &mut h.ledger, 1000, 0).unwrap();
    let first = h.pool.twap();
    assert_eq!(first.timestamp, START_TIME);

    h.clock.advance(59);
    h.pool.swap_x_for_y(bob(), &mut h.ledger, 1000, 0).unwrap();
    assert_eq!(h.pool.twap(), first);

    h.clock.advance(1);
    h.pool.swap_y_for_x(bob(), &mut h.ledger, 1000, 0).unwrap();
    let second = h.pool.twap();
    assert_eq!(second.timestamp, START_TIME + 60);
    assert_eq!((second.price_x, second.price_y), h.pool.get_reserves());
    assert_eq!(h.events.count("twap_sampled"), 2);
}

#[test]
fn test_liquidity_changes_do_not_sample_twap() {
    let mut h = Harness::seeded(1000, 1000);
    h.clock.advance(1_000);
    h.pool.add_liquidity(bob(), &mut h.ledger, 100, 100).unwrap();
    h.pool.remove_liquidity(bob(), &mut h.ledger, 100).unwrap();

    assert_eq!(h.pool.twap().timestamp, 0);
    assert_eq!(h.events.count("twap_sampled"), 0);
}

#[test]
fn test_snapshot_restore_preserves_state() {
    let mut h = Harness::seeded(1000, 3000);
    h.pool.add_liquidity(bob(), &mut h.ledger, 10, 30).unwrap();
    h.pool.swap_y_for_x(bob(), &mut h.ledger, 300, 0).unwrap();
    h.pool.add_governor(deployer(), alice()).unwrap();

    let bytes = h.pool.to_bytes().unwrap();
    let restored = Pool::from_bytes(&bytes, h.clock.clone(), h.events.clone()).unwrap();

    assert_eq!(restored.snapshot(), h.pool.snapshot());
    assert_eq!(restored.share_balance(&bob()), h.pool.share_balance(&bob()));
    assert_eq!(restored.governors(), vec![deployer(), alice()]);

    // Restored pool keeps trading from the same state
    let restored = Arc::new(restored);
    let mut ledger = h.ledger.clone();
    let a = h.pool.swap_x_for_y(bob(), &mut h.ledger, 50, 0).unwrap();
    let b = restored.swap_x_for_y(bob(), &mut ledger, 50, 0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_restore_rejects_garbage_bytes() {
    let h = Harness::new(30, 60);
    let err = Pool::from_bytes(&[1, 2, 3], h.clock.clone(), h.events.clone()).unwrap_err();
    assert!(matches!(err, AmmError::Serialization(_)));
}
