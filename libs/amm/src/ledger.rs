//! Reserve Ledger
//!
//! Holds both reserve balances, the total share supply and the per-holder
//! share balances. Every mutator validates before it writes, so an error
//! leaves the ledger exactly as it was.

use crate::error::{AmmError, Result};
use crate::types::{AccountId, Direction};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveLedger {
    reserve_x: u128,
    reserve_y: u128,
    total_shares: u128,
    balances: HashMap<AccountId, u128>,
}

impl ReserveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from raw parts; callers are responsible for validation
    pub(crate) fn from_parts(
        reserve_x: u128,
        reserve_y: u128,
        total_shares: u128,
        balances: HashMap<AccountId, u128>,
    ) -> Self {
        Self {
            reserve_x,
            reserve_y,
            total_shares,
            balances,
        }
    }

    pub fn reserves(&self) -> (u128, u128) {
        (self.reserve_x, self.reserve_y)
    }

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    pub fn share_balance(&self, holder: &AccountId) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Holders with a non-zero balance, in unspecified order
    pub fn holders(&self) -> impl Iterator<Item = (&AccountId, &u128)> {
        self.balances.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    /// Reserves in `(input, output)` order for a swap direction
    pub fn oriented(&self, direction: Direction) -> (u128, u128) {
        match direction {
            Direction::XToY => (self.reserve_x, self.reserve_y),
            Direction::YToX => (self.reserve_y, self.reserve_x),
        }
    }

    pub fn apply_deposit(&mut self, provider: AccountId, dx: u128, dy: u128, shares: u128) -> Result<()> {
        let reserve_x = self.reserve_x.checked_add(dx).ok_or(AmmError::ArithmeticOverflow)?;
        let reserve_y = self.reserve_y.checked_add(dy).ok_or(AmmError::ArithmeticOverflow)?;
        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(AmmError::ArithmeticOverflow)?;
        // Cannot overflow: a holder balance never exceeds total_shares
        let balance = self.share_balance(&provider) + shares;

        self.reserve_x = reserve_x;
        self.reserve_y = reserve_y;
        self.total_shares = total_shares;
        if balance > 0 {
            self.balances.insert(provider, balance);
        }
        Ok(())
    }

    pub fn apply_withdrawal(&mut self, provider: AccountId, shares: u128, dx: u128, dy: u128) -> Result<()> {
        let balance = self.share_balance(&provider);
        if shares > balance {
            return Err(AmmError::InsufficientShares {
                requested: shares,
                available: balance,
            });
        }
        let reserve_x = Self::debit(self.reserve_x, dx)?;
        let reserve_y = Self::debit(self.reserve_y, dy)?;

        self.reserve_x = reserve_x;
        self.reserve_y = reserve_y;
        self.total_shares -= shares;
        if balance == shares {
            self.balances.remove(&provider);
        } else {
            self.balances.insert(provider, balance - shares);
        }
        Ok(())
    }

    pub fn apply_swap(&mut self, amount_in: u128, amount_out: u128, direction: Direction) -> Result<()> {
        let (reserve_in, reserve_out) = self.oriented(direction);
        let new_in = reserve_in.checked_add(amount_in).ok_or(AmmError::ArithmeticOverflow)?;
        let new_out = Self::debit(reserve_out, amount_out)?;

        match direction {
            Direction::XToY => {
                self.reserve_x = new_in;
                self.reserve_y = new_out;
            }
            Direction::YToX => {
                self.reserve_y = new_in;
                self.reserve_x = new_out;
            }
        }
        Ok(())
    }

    fn debit(reserve: u128, amount: u128) -> Result<u128> {
        reserve
            .checked_sub(amount)
            .ok_or(AmmError::InsufficientReserves {
                requested: amount,
                available: reserve,
            })
    }

    /// Sum of holder balances, equal to `total_shares` whenever the ledger is consistent
    pub fn share_sum(&self) -> Option<u128> {
        self.balances
            .values()
            .try_fold(0u128, |acc, balance| acc.checked_add(*balance))
    }
}
