//! Scripted pool lifecycle on a mock token ledger
//!
//! One provider seeds the pool, a trader swaps in both directions with the
//! clock advanced past the TWAP interval in between, then the provider exits.

use amm::{
    AccountId, Asset, Clock, Direction, InMemoryTokenLedger, ManualClock, MemoryEventSink, Pool,
    PoolEvent, TwapSample,
};
use anyhow::{Context, Result};
use config::PoolSettings;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

const START_TIME: u64 = 1_700_000_000;
const SEED_X: u128 = 1_000_000;
const SEED_Y: u128 = 2_000_000;
const TRADE_SIZE: u128 = 10_000;

fn pool_account() -> AccountId {
    AccountId::from_u64(0x9001)
}

fn provider() -> AccountId {
    AccountId::from_u64(0x1001)
}

fn trader() -> AccountId {
    AccountId::from_u64(0x2001)
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapRecord {
    pub direction: Direction,
    pub amount_in: u128,
    pub amount_out: u128,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub fee_bps: u32,
    pub twap_interval_secs: u64,
    pub shares_minted: u128,
    pub swaps: Vec<SwapRecord>,
    pub reserves_before_exit: (u128, u128),
    pub withdrawn: (u128, u128),
    pub final_reserves: (u128, u128),
    pub twap: TwapSample,
    pub events: Vec<PoolEvent>,
}

impl ScenarioReport {
    pub fn print(&self) {
        println!("fee:             {} bps", self.fee_bps);
        println!("twap interval:   {}s", self.twap_interval_secs);
        println!("shares minted:   {}", self.shares_minted);
        for swap in &self.swaps {
            println!(
                "swap {:<6}     {} in, {} out at t={}",
                swap.direction.to_string(),
                swap.amount_in,
                swap.amount_out,
                swap.timestamp
            );
        }
        println!(
            "reserves:        ({}, {}) before exit",
            self.reserves_before_exit.0, self.reserves_before_exit.1
        );
        println!("withdrawn:       ({}, {})", self.withdrawn.0, self.withdrawn.1);
        match self.twap.price_of_x() {
            Some(price) => println!(
                "twap sample:     1 X = {} Y at t={}",
                price, self.twap.timestamp
            ),
            None => println!("twap sample:     none"),
        }
        println!("events ({}):", self.events.len());
        for event in &self.events {
            println!("  {}", event.name());
        }
    }
}

/// Run the scripted lifecycle against a fresh pool built from `settings`
pub fn run(settings: &PoolSettings) -> Result<ScenarioReport> {
    let deployer = settings.deployer_account()?;
    let pool_config = settings.pool_config()?;

    let clock = Arc::new(ManualClock::new(START_TIME));
    let events = Arc::new(MemoryEventSink::new());
    let pool = Pool::new(pool_config, deployer, clock.clone(), events.clone())
        .context("Failed to create pool")?;

    let mut ledger = InMemoryTokenLedger::new(pool_account());
    for asset in [Asset::X, Asset::Y] {
        ledger.mint(asset, provider(), SEED_X.max(SEED_Y));
        ledger.mint(asset, trader(), TRADE_SIZE * 10);
    }

    let shares_minted = pool
        .add_liquidity(provider(), &mut ledger, SEED_X, SEED_Y)
        .context("Seed deposit failed")?;
    info!(shares_minted, "Pool seeded");

    let mut swaps = Vec::new();
    for direction in [Direction::XToY, Direction::YToX] {
        let timestamp = clock.now();
        let quote = pool.quote(direction, TRADE_SIZE)?;
        let amount_out = pool
            .swap(trader(), &mut ledger, direction, TRADE_SIZE, quote)
            .with_context(|| format!("Swap {direction} failed"))?;
        swaps.push(SwapRecord {
            direction,
            amount_in: TRADE_SIZE,
            amount_out,
            timestamp,
        });
        clock.advance(pool_config.twap_interval_secs);
    }

    let reserves_before_exit = pool.get_reserves();
    let shares = pool.share_balance(&provider());
    let withdrawn = pool
        .remove_liquidity(provider(), &mut ledger, shares)
        .context("Provider exit failed")?;

    Ok(ScenarioReport {
        fee_bps: pool.fee_bps(),
        twap_interval_secs: pool.twap_interval_secs(),
        shares_minted,
        swaps,
        reserves_before_exit,
        withdrawn,
        final_reserves: pool.get_reserves(),
        twap: pool.twap(),
        events: events.events(),
    })
}
