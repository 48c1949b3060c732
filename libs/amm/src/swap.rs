//! Swap Executor

use crate::environment::TokenLedger;
use crate::error::{AmmError, Result};
use crate::events::PoolEvent;
use crate::pool::Pool;
use crate::pricing::{quote_input, quote_output};
use crate::settlement::{settle, unwind, Transfer};
use crate::types::{AccountId, Direction};
use tracing::{debug, info};

impl Pool {
    /// Output for `amount_in` against the current reserves and fee
    pub fn quote(&self, direction: Direction, amount_in: u128) -> Result<u128> {
        let state = self.state.lock();
        let (reserve_in, reserve_out) = state.ledger.oriented(direction);
        quote_output(amount_in, reserve_in, reserve_out, state.fee_bps)
    }

    /// Input needed to receive at least `amount_out` at the current reserves and fee
    pub fn quote_exact_output(&self, direction: Direction, amount_out: u128) -> Result<u128> {
        let state = self.state.lock();
        let (reserve_in, reserve_out) = state.ledger.oriented(direction);
        quote_input(amount_out, reserve_in, reserve_out, state.fee_bps)
    }

    pub fn swap_x_for_y(
        &self,
        caller: AccountId,
        ledger: &mut dyn TokenLedger,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128> {
        self.swap(caller, ledger, Direction::XToY, amount_in, min_amount_out)
    }

    pub fn swap_y_for_x(
        &self,
        caller: AccountId,
        ledger: &mut dyn TokenLedger,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128> {
        self.swap(caller, ledger, Direction::YToX, amount_in, min_amount_out)
    }

    /// Swap `amount_in` of the direction's input asset, failing if fewer than
    /// `min_amount_out` units would come back
    pub fn swap(
        &self,
        caller: AccountId,
        ledger: &mut dyn TokenLedger,
        direction: Direction,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128> {
        let _call = self.guard.enter("swap")?;
        if amount_in == 0 {
            return Err(AmmError::InvalidAmount);
        }

        // Priced on pre-swap reserves; the call guard keeps them fixed until commit
        let amount_out = self.quote(direction, amount_in)?;
        if amount_out < min_amount_out {
            debug!(%caller, %direction, amount_in, amount_out, min_amount_out, "Swap rejected by slippage floor");
            return Err(AmmError::SlippageExceeded {
                amount_out,
                min_amount_out,
            });
        }

        let transfers = [
            Transfer::Pull(direction.input_asset(), amount_in),
            Transfer::Push(direction.output_asset(), amount_out),
        ];
        settle(ledger, caller, &transfers)?;

        let now = self.clock.now();
        let (reserves, sample) = {
            let mut state = self.state.lock();
            if let Err(err) = state.ledger.apply_swap(amount_in, amount_out, direction) {
                drop(state);
                unwind(ledger, caller, &transfers);
                return Err(err);
            }
            let reserves = state.ledger.reserves();
            let sample = state.twap.maybe_sample(reserves, now);
            (reserves, sample)
        };

        info!(
            %caller,
            %direction,
            amount_in,
            amount_out,
            reserve_x = reserves.0,
            reserve_y = reserves.1,
            "Swap executed"
        );
        match sample {
            Some(sample) => {
                debug!(timestamp = sample.timestamp, "TWAP sampled");
                self.emit(PoolEvent::TwapSampled {
                    price_x: sample.price_x,
                    price_y: sample.price_y,
                    timestamp: sample.timestamp,
                });
            }
            None => debug!("TWAP interval not elapsed; sample kept"),
        }
        self.emit(PoolEvent::Swap {
            trader: caller,
            direction,
            amount_in,
            amount_out,
        });
        Ok(amount_out)
    }
}
