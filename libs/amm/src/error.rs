//! Pool error taxonomy
//!
//! Every failure aborts the whole entry point with no state change. Variants
//! are distinct so callers can decide whether to retry with adjusted inputs.

use crate::types::{AccountId, Asset};
use thiserror::Error;

/// Failures reported by a [`crate::TokenLedger`] implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient {asset} balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        asset: Asset,
        required: u128,
        available: u128,
    },

    #[error("Transfer of {amount} {asset} rejected: {reason}")]
    Rejected {
        asset: Asset,
        amount: u128,
        reason: String,
    },
}

/// Pool operation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Deposit {amount_x}/{amount_y} does not match reserve ratio {reserve_x}/{reserve_y}")]
    UnbalancedDeposit {
        amount_x: u128,
        amount_y: u128,
        reserve_x: u128,
        reserve_y: u128,
    },

    #[error("Deposit too small: zero shares would be minted")]
    ZeroLiquidityMinted,

    #[error("Insufficient reserves: requested {requested}, available {available}")]
    InsufficientReserves { requested: u128, available: u128 },

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u128, available: u128 },

    #[error("Share amount must be greater than zero")]
    InvalidShareAmount,

    #[error("Slippage exceeded: output {amount_out} below minimum {min_amount_out}")]
    SlippageExceeded { amount_out: u128, min_amount_out: u128 },

    #[error("Account {0} is not a governor")]
    NotGovernor(AccountId),

    #[error("Invalid fee: {0} bps (must be below 10000)")]
    InvalidFee(u32),

    #[error("Governor address must not be the zero address")]
    InvalidGovernorAddress,

    #[error("Account {0} is already a governor")]
    GovernorAlreadyExists(AccountId),

    #[error("Account {0} is not in the governor set")]
    GovernorNotFound(AccountId),

    #[error("Reentrant call rejected: pool operation already in progress")]
    ReentrantCall,

    #[error("Pool has no liquidity")]
    NoLiquidity,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AmmError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            reason: reason.into(),
        }
    }
}

impl From<bincode::Error> for AmmError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, AmmError>;
