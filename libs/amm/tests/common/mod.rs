//! Common Test Utilities for pool tests
//!
//! A mock-token harness: one pool, one in-memory ledger with funded traders,
//! a manual clock and an in-memory event log.

#![allow(dead_code)]

use amm::{AccountId, Asset, InMemoryTokenLedger, ManualClock, MemoryEventSink, Pool, PoolConfig};
use std::sync::Arc;

pub const START_TIME: u64 = 1_700_000_000;

pub fn deployer() -> AccountId {
    AccountId::from_u64(0xd0)
}

pub fn alice() -> AccountId {
    AccountId::from_u64(0xa1)
}

pub fn bob() -> AccountId {
    AccountId::from_u64(0xb0)
}

pub fn pool_account() -> AccountId {
    AccountId::from_u64(0x9001)
}

pub struct Harness {
    pub pool: Arc<Pool>,
    pub ledger: InMemoryTokenLedger,
    pub clock: Arc<ManualClock>,
    pub events: Arc<MemoryEventSink>,
}

impl Harness {
    pub fn new(fee_bps: u32, twap_interval_secs: u64) -> Self {
        let clock = Arc::new(ManualClock::new(START_TIME));
        let events = Arc::new(MemoryEventSink::new());
        let pool = Pool::new(
            PoolConfig {
                fee_bps,
                twap_interval_secs,
            },
            deployer(),
            clock.clone(),
            events.clone(),
        )
        .expect("valid pool config");

        Self {
            pool: Arc::new(pool),
            ledger: InMemoryTokenLedger::new(pool_account()),
            clock,
            events,
        }
    }

    /// Give `account` `amount` of both assets
    pub fn fund(&mut self, account: AccountId, amount: u128) {
        self.ledger.mint(Asset::X, account, amount);
        self.ledger.mint(Asset::Y, account, amount);
    }

    /// Fresh 30 bps pool seeded by alice with `(x, y)`
    pub fn seeded(x: u128, y: u128) -> Self {
        let mut harness = Self::new(30, 60);
        harness.fund(alice(), x.max(y) * 10);
        harness.fund(bob(), x.max(y) * 10);
        harness
            .pool
            .add_liquidity(alice(), &mut harness.ledger, x, y)
            .expect("seed deposit");
        harness
    }

    pub fn pool_balances(&self) -> (u128, u128) {
        (
            self.ledger.balance_of(Asset::X, pool_account()),
            self.ledger.balance_of(Asset::Y, pool_account()),
        )
    }
}
