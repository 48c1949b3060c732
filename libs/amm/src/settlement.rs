//! Ordered transfer batches against a [`TokenLedger`]
//!
//! A batch either completes or is unwound in reverse order, so a failed
//! entry point never leaves value stranded on one side of the pool.

use crate::environment::TokenLedger;
use crate::error::{Result, TransferError};
use crate::types::{AccountId, Asset};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Account to pool
    Pull(Asset, u128),
    /// Pool to account
    Push(Asset, u128),
}

impl Transfer {
    fn reverse(self) -> Self {
        match self {
            Transfer::Pull(asset, amount) => Transfer::Push(asset, amount),
            Transfer::Push(asset, amount) => Transfer::Pull(asset, amount),
        }
    }

    fn apply(self, ledger: &mut dyn TokenLedger, account: AccountId) -> std::result::Result<(), TransferError> {
        match self {
            Transfer::Pull(_, 0) | Transfer::Push(_, 0) => Ok(()),
            Transfer::Pull(asset, amount) => ledger.pull(asset, account, amount),
            Transfer::Push(asset, amount) => ledger.push(asset, account, amount),
        }
    }
}

/// Run `transfers` in order; on the first failure unwind the completed prefix
pub(crate) fn settle(ledger: &mut dyn TokenLedger, account: AccountId, transfers: &[Transfer]) -> Result<()> {
    for (done, transfer) in transfers.iter().enumerate() {
        if let Err(err) = transfer.apply(ledger, account) {
            unwind(ledger, account, &transfers[..done]);
            return Err(err.into());
        }
    }
    Ok(())
}

/// Reverse completed transfers, newest first
pub(crate) fn unwind(ledger: &mut dyn TokenLedger, account: AccountId, completed: &[Transfer]) {
    for transfer in completed.iter().rev() {
        let reversal = transfer.reverse();
        if let Err(err) = reversal.apply(ledger, account) {
            error!(%account, ?reversal, %err, "Compensating transfer failed");
        }
    }
}
