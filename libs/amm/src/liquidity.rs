//! Liquidity Manager
//!
//! Deposits pull both assets before crediting shares. Withdrawals burn shares
//! before paying out, so a reentrant caller can never redeem the same shares
//! twice.

use crate::environment::TokenLedger;
use crate::error::{AmmError, Result};
use crate::events::PoolEvent;
use crate::ledger::ReserveLedger;
use crate::pool::Pool;
use crate::pricing::{isqrt, mul, to_u128};
use crate::settlement::{settle, unwind, Transfer};
use crate::types::{AccountId, Asset};
use ethnum::U256;
use tracing::{debug, error, info};

/// Shares minted for depositing `(amount_x, amount_y)` into `ledger`
///
/// An empty pool mints `floor(sqrt(x * y))`. A funded pool requires the exact
/// reserve ratio and mints the smaller of the two pro-rata amounts.
pub fn shares_for_deposit(ledger: &ReserveLedger, amount_x: u128, amount_y: u128) -> Result<u128> {
    if amount_x == 0 || amount_y == 0 {
        return Err(AmmError::InvalidAmount);
    }

    let (reserve_x, reserve_y) = ledger.reserves();
    if (reserve_x > 0 || reserve_y > 0) && mul(amount_x, reserve_y) != mul(amount_y, reserve_x) {
        return Err(AmmError::UnbalancedDeposit {
            amount_x,
            amount_y,
            reserve_x,
            reserve_y,
        });
    }

    let total_shares = ledger.total_shares();
    let shares = if total_shares == 0 {
        to_u128(isqrt(mul(amount_x, amount_y)))?
    } else {
        let by_x = mul(amount_x, total_shares) / U256::from(reserve_x);
        let by_y = mul(amount_y, total_shares) / U256::from(reserve_y);
        to_u128(by_x.min(by_y))?
    };

    if shares == 0 {
        return Err(AmmError::ZeroLiquidityMinted);
    }
    Ok(shares)
}

/// Pro-rata `(amount_x, amount_y)` redeemed by burning `shares`
pub fn amounts_for_shares(ledger: &ReserveLedger, shares: u128) -> Result<(u128, u128)> {
    let total_shares = ledger.total_shares();
    if shares == 0 || total_shares == 0 {
        return Err(AmmError::InvalidShareAmount);
    }
    if shares > total_shares {
        return Err(AmmError::InsufficientShares {
            requested: shares,
            available: total_shares,
        });
    }

    let (reserve_x, reserve_y) = ledger.reserves();
    let total = U256::from(total_shares);
    let amount_x = to_u128(mul(shares, reserve_x) / total)?;
    let amount_y = to_u128(mul(shares, reserve_y) / total)?;
    Ok((amount_x, amount_y))
}

impl Pool {
    /// Deposit both assets in the current reserve ratio and receive shares
    pub fn add_liquidity(
        &self,
        caller: AccountId,
        ledger: &mut dyn TokenLedger,
        amount_x: u128,
        amount_y: u128,
    ) -> Result<u128> {
        let _call = self.guard.enter("add_liquidity")?;

        let shares = shares_for_deposit(&self.state.lock().ledger, amount_x, amount_y)?;
        debug!(%caller, amount_x, amount_y, shares, "Deposit quoted");

        let transfers = [Transfer::Pull(Asset::X, amount_x), Transfer::Pull(Asset::Y, amount_y)];
        settle(ledger, caller, &transfers)?;

        let committed = self
            .state
            .lock()
            .ledger
            .apply_deposit(caller, amount_x, amount_y, shares);
        if let Err(err) = committed {
            unwind(ledger, caller, &transfers);
            return Err(err);
        }

        info!(%caller, amount_x, amount_y, shares, "Liquidity added");
        self.emit(PoolEvent::Deposit {
            provider: caller,
            amount_x,
            amount_y,
            shares,
        });
        Ok(shares)
    }

    /// Burn `shares` and receive the pro-rata slice of both reserves
    pub fn remove_liquidity(
        &self,
        caller: AccountId,
        ledger: &mut dyn TokenLedger,
        shares: u128,
    ) -> Result<(u128, u128)> {
        let _call = self.guard.enter("remove_liquidity")?;
        if shares == 0 {
            return Err(AmmError::InvalidShareAmount);
        }

        let (amount_x, amount_y) = {
            let mut state = self.state.lock();
            let balance = state.ledger.share_balance(&caller);
            if shares > balance {
                return Err(AmmError::InsufficientShares {
                    requested: shares,
                    available: balance,
                });
            }
            let (amount_x, amount_y) = amounts_for_shares(&state.ledger, shares)?;
            if amount_x == 0 && amount_y == 0 {
                return Err(AmmError::InvalidShareAmount);
            }
            state.ledger.apply_withdrawal(caller, shares, amount_x, amount_y)?;
            (amount_x, amount_y)
        };

        let transfers = [Transfer::Push(Asset::X, amount_x), Transfer::Push(Asset::Y, amount_y)];
        if let Err(err) = settle(ledger, caller, &transfers) {
            let restored = self
                .state
                .lock()
                .ledger
                .apply_deposit(caller, amount_x, amount_y, shares);
            if let Err(restore_err) = restored {
                error!(%caller, shares, %restore_err, "Failed to restore burned shares");
            }
            return Err(err);
        }

        info!(%caller, shares, amount_x, amount_y, "Liquidity removed");
        self.emit(PoolEvent::Withdrawal {
            provider: caller,
            shares,
            amount_x,
            amount_y,
        });
        Ok((amount_x, amount_y))
    }
}
