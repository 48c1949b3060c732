//! # CPMM Pool Core - Constant Product State Transitions
//!
//! ## Purpose
//!
//! State-transition core of a two-asset constant-product market maker. Holds the
//! paired reserves, issues and redeems proportional shares, executes swaps under a
//! basis-point fee and keeps a manipulation-resistant TWAP sample. All arithmetic is
//! exact integer math with 256-bit intermediates.
//!
//! ## Integration Points
//!
//! - **Value transfer**: [`TokenLedger`] passed into every value-moving entry point
//! - **Time**: [`Clock`] supplied at construction, read only when a swap samples the TWAP
//! - **Audit**: [`EventSink`] receives a [`PoolEvent`] for every committed change
//! - **Identity**: the acting [`AccountId`] is an explicit argument, never ambient state
//!
//! ## Architecture Role
//!
//! ```text
//! add/remove_liquidity ──┐
//!                        ├─→ [CallGuard] ─→ [Pricing] ─→ [Settlement] ─→ [Reserve Ledger] ─→ [EventSink]
//! swap_x_for_y/y_for_x ──┘                                                      │
//!                                                                               └─→ [TWAP Oracle] (swaps only)
//! set_fee / governors ─────→ [CallGuard] ─→ [Governor Set] ─→ [EventSink]
//! ```
//!
//! ## Failure Model
//!
//! Every entry point is all-or-nothing. Transfers are settled in order and unwound
//! on failure; ledger mutations validate before writing. A nested call into any
//! mutating entry point while another is in progress fails with
//! [`AmmError::ReentrantCall`].

pub mod environment;
pub mod error;
pub mod events;
pub mod governance;
pub mod guard;
pub mod ledger;
pub mod liquidity;
pub mod pool;
pub mod pricing;
mod settlement;
pub mod swap;
pub mod twap;
pub mod types;

pub use environment::{
    Clock, EventSink, InMemoryTokenLedger, ManualClock, MemoryEventSink, SystemClock, TokenLedger,
    TracingEventSink,
};
pub use error::{AmmError, Result, TransferError};
pub use events::PoolEvent;
pub use governance::GovernorSet;
pub use ledger::ReserveLedger;
pub use pool::{Pool, PoolConfig, PoolSnapshot};
pub use pricing::{quote_input, quote_output, spot_price, BPS_DENOMINATOR};
pub use twap::{TwapOracle, TwapSample};
pub use types::{AccountId, AccountIdParseError, Asset, Direction};

/// Common types for pool calculations
pub use ethnum::U256;
pub use rust_decimal::Decimal;
