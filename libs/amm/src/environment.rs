//! Host collaborator seams
//!
//! The pool never moves value, reads wall time or stores audit records
//! itself. Hosts supply a [`TokenLedger`] per call and a [`Clock`] plus an
//! [`EventSink`] at construction. In-memory implementations are provided for
//! harnesses, simulations and tests.

use crate::error::TransferError;
use crate::events::PoolEvent;
use crate::types::{AccountId, Asset};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Value transfer between accounts and the pool
///
/// Each call must either complete fully or fail without effect.
pub trait TokenLedger {
    /// Move `amount` of `asset` from `from` into the pool
    fn pull(&mut self, asset: Asset, from: AccountId, amount: u128) -> Result<(), TransferError>;

    /// Move `amount` of `asset` from the pool to `to`
    fn push(&mut self, asset: Asset, to: AccountId, amount: u128) -> Result<(), TransferError>;
}

/// Monotonically non-decreasing timestamp source, in seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Append-only audit record sink
pub trait EventSink: Send + Sync {
    fn record(&self, event: &PoolEvent);
}

/// Wall clock in UNIX seconds
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock; never moves backwards
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, secs: u64) {
        // fetch_update never fails with an always-Some closure
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| Some(t.saturating_add(secs)));
    }

    /// Move to `timestamp`, ignoring attempts to go backwards
    pub fn set(&self, timestamp: u64) {
        self.now.fetch_max(timestamp, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<PoolEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Count of recorded events with the given [`PoolEvent::name`]
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSink for MemoryEventSink {
    fn record(&self, event: &PoolEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Emits each event as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: &PoolEvent) {
        info!(event = event.name(), details = ?event, "Pool event");
    }
}

/// Mock two-asset token ledger with a single pool account
#[derive(Debug, Clone)]
pub struct InMemoryTokenLedger {
    pool_account: AccountId,
    balances: HashMap<(Asset, AccountId), u128>,
}

impl InMemoryTokenLedger {
    pub fn new(pool_account: AccountId) -> Self {
        Self {
            pool_account,
            balances: HashMap::new(),
        }
    }

    pub fn pool_account(&self) -> AccountId {
        self.pool_account
    }

    /// Create `amount` of `asset` out of thin air for `account`
    pub fn mint(&mut self, asset: Asset, account: AccountId, amount: u128) {
        let balance = self.balances.entry((asset, account)).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, asset: Asset, account: AccountId) -> u128 {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    fn transfer(&mut self, asset: Asset, from: AccountId, to: AccountId, amount: u128) -> Result<(), TransferError> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: from,
                asset,
                required: amount,
                available,
            });
        }
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected {
                asset,
                amount,
                reason: format!("balance overflow for {to}"),
            })?;

        self.balances.insert((asset, from), available - amount);
        self.balances.insert((asset, to), credited);
        Ok(())
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn pull(&mut self, asset: Asset, from: AccountId, amount: u128) -> Result<(), TransferError> {
        let pool = self.pool_account;
        self.transfer(asset, from, pool, amount)
    }

    fn push(&mut self, asset: Asset, to: AccountId, amount: u128) -> Result<(), TransferError> {
        let pool = self.pool_account;
        self.transfer(asset, pool, to, amount)
    }
}
