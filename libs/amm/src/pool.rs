//! Pool aggregate
//!
//! The pool owns every piece of mutable state: the reserve ledger, the fee,
//! the TWAP oracle and the governor set. State sits behind a mutex that is
//! only held for reads and final commits, never across a ledger call or a
//! clock read. Hosts serialize mutating calls; the [`CallGuard`] does not
//! queue them, it rejects any overlapping call with
//! [`AmmError::ReentrantCall`](crate::error::AmmError::ReentrantCall).

use crate::environment::{Clock, EventSink};
use crate::error::{AmmError, Result};
use crate::events::PoolEvent;
use crate::governance::GovernorSet;
use crate::guard::CallGuard;
use crate::ledger::ReserveLedger;
use crate::pricing::{mul, spot_price, BPS_DENOMINATOR};
use crate::twap::{TwapOracle, TwapSample};
use crate::types::AccountId;
use ethnum::U256;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Initial protocol parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub fee_bps: u32,
    pub twap_interval_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_bps: 30,
            twap_interval_secs: 300,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fee_bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFee(self.fee_bps));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PoolState {
    pub(crate) ledger: ReserveLedger,
    pub(crate) fee_bps: u32,
    pub(crate) twap: TwapOracle,
    pub(crate) governors: GovernorSet,
}

pub struct Pool {
    pub(crate) state: Mutex<PoolState>,
    pub(crate) guard: CallGuard,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("state", &*self.state.lock())
            .field("call_active", &self.guard.is_active())
            .finish()
    }
}

impl Pool {
    /// Create an empty pool governed by `deployer`
    pub fn new(
        config: PoolConfig,
        deployer: AccountId,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;
        let governors = GovernorSet::with_founder(deployer)?;

        info!(
            %deployer,
            fee_bps = config.fee_bps,
            twap_interval_secs = config.twap_interval_secs,
            "Pool created"
        );

        Ok(Self {
            state: Mutex::new(PoolState {
                ledger: ReserveLedger::new(),
                fee_bps: config.fee_bps,
                twap: TwapOracle::new(config.twap_interval_secs),
                governors,
            }),
            guard: CallGuard::new(),
            clock,
            events,
        })
    }

    pub(crate) fn emit(&self, event: PoolEvent) {
        self.events.record(&event);
    }

    pub fn get_reserves(&self) -> (u128, u128) {
        self.state.lock().ledger.reserves()
    }

    pub fn total_shares(&self) -> u128 {
        self.state.lock().ledger.total_shares()
    }

    pub fn share_balance(&self, holder: &AccountId) -> u128 {
        self.state.lock().ledger.share_balance(holder)
    }

    pub fn fee_bps(&self) -> u32 {
        self.state.lock().fee_bps
    }

    pub fn twap_interval_secs(&self) -> u64 {
        self.state.lock().twap.interval_secs()
    }

    pub fn twap(&self) -> TwapSample {
        self.state.lock().twap.sample()
    }

    /// Product of the two reserves
    pub fn k(&self) -> U256 {
        let (x, y) = self.get_reserves();
        mul(x, y)
    }

    /// Current price of one unit of X in Y
    pub fn spot_price_x(&self) -> Option<Decimal> {
        let (x, y) = self.get_reserves();
        spot_price(x, y)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        let (reserve_x, reserve_y) = state.ledger.reserves();
        let mut balances: Vec<(AccountId, u128)> =
            state.ledger.holders().map(|(k, v)| (*k, *v)).collect();
        balances.sort_unstable();

        PoolSnapshot {
            reserve_x,
            reserve_y,
            total_shares: state.ledger.total_shares(),
            balances,
            fee_bps: state.fee_bps,
            twap_interval_secs: state.twap.interval_secs(),
            twap: state.twap.sample(),
            governors: state.governors.members().to_vec(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.snapshot())?)
    }

    /// Rebuild a pool from a snapshot, rejecting any that break pool invariants
    pub fn restore(snapshot: PoolSnapshot, clock: Arc<dyn Clock>, events: Arc<dyn EventSink>) -> Result<Self> {
        let state = snapshot.into_state()?;
        info!(
            reserve_x = state.ledger.reserves().0,
            reserve_y = state.ledger.reserves().1,
            total_shares = state.ledger.total_shares(),
            "Pool restored from snapshot"
        );
        Ok(Self {
            state: Mutex::new(state),
            guard: CallGuard::new(),
            clock,
            events,
        })
    }

    pub fn from_bytes(bytes: &[u8], clock: Arc<dyn Clock>, events: Arc<dyn EventSink>) -> Result<Self> {
        let snapshot: PoolSnapshot = bincode::deserialize(bytes)?;
        Self::restore(snapshot, clock, events)
    }
}

/// Complete serializable pool state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub reserve_x: u128,
    pub reserve_y: u128,
    pub total_shares: u128,
    /// Non-zero holder balances, sorted by account
    pub balances: Vec<(AccountId, u128)>,
    pub fee_bps: u32,
    pub twap_interval_secs: u64,
    pub twap: TwapSample,
    /// Governors in set order
    pub governors: Vec<AccountId>,
}

impl PoolSnapshot {
    fn into_state(self) -> Result<PoolState> {
        if self.fee_bps >= BPS_DENOMINATOR {
            return Err(AmmError::corrupt(format!("fee {} bps out of range", self.fee_bps)));
        }
        if self.total_shares > 0 && (self.reserve_x == 0 || self.reserve_y == 0) {
            return Err(AmmError::corrupt("shares outstanding against an empty reserve"));
        }
        if (self.reserve_x == 0) != (self.reserve_y == 0) {
            return Err(AmmError::corrupt("only one reserve is funded"));
        }

        let mut balances = HashMap::with_capacity(self.balances.len());
        let mut share_sum = 0u128;
        for (holder, balance) in self.balances {
            if balance == 0 {
                return Err(AmmError::corrupt(format!("zero balance recorded for {holder}")));
            }
            if balances.insert(holder, balance).is_some() {
                return Err(AmmError::corrupt(format!("duplicate holder {holder}")));
            }
            share_sum = share_sum
                .checked_add(balance)
                .ok_or_else(|| AmmError::corrupt("share balances overflow"))?;
        }
        if share_sum != self.total_shares {
            return Err(AmmError::corrupt(format!(
                "holder balances sum to {share_sum}, total shares is {}",
                self.total_shares
            )));
        }

        let mut governors = GovernorSet::new();
        for governor in self.governors {
            governors
                .insert(governor)
                .map_err(|e| AmmError::corrupt(format!("governor set: {e}")))?;
        }

        Ok(PoolState {
            ledger: ReserveLedger::from_parts(self.reserve_x, self.reserve_y, self.total_shares, balances),
            fee_bps: self.fee_bps,
            twap: TwapOracle::with_sample(self.twap_interval_secs, self.twap),
            governors,
        })
    }
}
