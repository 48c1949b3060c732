//! TWAP Oracle
//!
//! Keeps one reserve-pair sample, refreshed by swaps at most once per
//! interval. A single transaction therefore cannot force more than one
//! sample.

use crate::pricing::spot_price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reserve pair as of the last qualifying swap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwapSample {
    pub price_x: u128,
    pub price_y: u128,
    pub timestamp: u64,
}

impl TwapSample {
    /// Price of one unit of X in Y at sampling time
    pub fn price_of_x(&self) -> Option<Decimal> {
        spot_price(self.price_x, self.price_y)
    }

    /// Price of one unit of Y in X at sampling time
    pub fn price_of_y(&self) -> Option<Decimal> {
        spot_price(self.price_y, self.price_x)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwapOracle {
    interval_secs: u64,
    sample: TwapSample,
}

impl TwapOracle {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            sample: TwapSample::default(),
        }
    }

    pub(crate) fn with_sample(interval_secs: u64, sample: TwapSample) -> Self {
        Self { interval_secs, sample }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn set_interval(&mut self, interval_secs: u64) {
        self.interval_secs = interval_secs;
    }

    pub fn sample(&self) -> TwapSample {
        self.sample
    }

    /// Whether a sample taken at `now` would be accepted
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.sample.timestamp.saturating_add(self.interval_secs)
    }

    /// Overwrite the sample with `reserves` if the interval has elapsed
    pub fn maybe_sample(&mut self, reserves: (u128, u128), now: u64) -> Option<TwapSample> {
        if !self.is_due(now) {
            return None;
        }
        self.sample = TwapSample {
            price_x: reserves.0,
            price_y: reserves.1,
            timestamp: now,
        };
        Some(self.sample)
    }
}
