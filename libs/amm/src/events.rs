//! Audit records emitted by pool entry points

use crate::types::{AccountId, Direction};
use serde::Serialize;

/// Append-only record of every committed state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    Deposit {
        provider: AccountId,
        amount_x: u128,
        amount_y: u128,
        shares: u128,
    },
    Withdrawal {
        provider: AccountId,
        shares: u128,
        amount_x: u128,
        amount_y: u128,
    },
    Swap {
        trader: AccountId,
        direction: Direction,
        amount_in: u128,
        amount_out: u128,
    },
    FeeUpdated {
        governor: AccountId,
        old_fee_bps: u32,
        new_fee_bps: u32,
    },
    TwapIntervalUpdated {
        governor: AccountId,
        old_interval_secs: u64,
        new_interval_secs: u64,
    },
    GovernorAdded {
        governor: AccountId,
        added: AccountId,
    },
    GovernorRemoved {
        governor: AccountId,
        removed: AccountId,
    },
    TwapSampled {
        price_x: u128,
        price_y: u128,
        timestamp: u64,
    },
}

impl PoolEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::Deposit { .. } => "deposit",
            PoolEvent::Withdrawal { .. } => "withdrawal",
            PoolEvent::Swap { .. } => "swap",
            PoolEvent::FeeUpdated { .. } => "fee_updated",
            PoolEvent::TwapIntervalUpdated { .. } => "twap_interval_updated",
            PoolEvent::GovernorAdded { .. } => "governor_added",
            PoolEvent::GovernorRemoved { .. } => "governor_removed",
            PoolEvent::TwapSampled { .. } => "twap_sampled",
        }
    }
}
