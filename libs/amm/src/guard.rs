//! Reentrancy protection for pool entry points
//!
//! A single active-call flag per pool. Mutating entry points hold a
//! [`CallToken`] for their whole body; dropping the token clears the flag on
//! every exit path, including `?` early returns.

use crate::error::{AmmError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

#[derive(Debug, Default)]
pub struct CallGuard {
    active: AtomicBool,
}

impl CallGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a call as active, failing if one already is
    pub fn enter(&self, operation: &'static str) -> Result<CallToken<'_>> {
        if self
            .active
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!(operation, "Rejected reentrant pool call");
            return Err(AmmError::ReentrantCall);
        }
        Ok(CallToken { guard: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Scoped proof that the caller owns the active-call flag
#[must_use = "the call guard is released as soon as the token is dropped"]
pub struct CallToken<'a> {
    guard: &'a CallGuard,
}

impl Drop for CallToken<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}
