//! Governance Registry
//!
//! Unordered governor set with O(1) membership and O(1) removal: members live
//! in a Vec and an index map points at each member's slot. Removal swaps the
//! last member into the vacated slot.

use crate::error::{AmmError, Result};
use crate::events::PoolEvent;
use crate::pool::Pool;
use crate::pricing::BPS_DENOMINATOR;
use crate::types::AccountId;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GovernorSet {
    members: Vec<AccountId>,
    index: HashMap<AccountId, usize>,
}

impl GovernorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_founder(founder: AccountId) -> Result<Self> {
        let mut set = Self::new();
        set.insert(founder)?;
        Ok(set)
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.index.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[AccountId] {
        &self.members
    }

    pub fn insert(&mut self, account: AccountId) -> Result<()> {
        if account.is_zero() {
            return Err(AmmError::InvalidGovernorAddress);
        }
        if self.contains(&account) {
            return Err(AmmError::GovernorAlreadyExists(account));
        }
        self.index.insert(account, self.members.len());
        self.members.push(account);
        Ok(())
    }

    pub fn remove(&mut self, account: &AccountId) -> Result<()> {
        let slot = self
            .index
            .remove(account)
            .ok_or(AmmError::GovernorNotFound(*account))?;
        self.members.swap_remove(slot);
        if let Some(moved) = self.members.get(slot) {
            self.index.insert(*moved, slot);
        }
        Ok(())
    }
}

impl Pool {
    pub fn is_governor(&self, account: &AccountId) -> bool {
        self.state.lock().governors.contains(account)
    }

    /// Current governors in set order
    pub fn governors(&self) -> Vec<AccountId> {
        self.state.lock().governors.members().to_vec()
    }

    fn ensure_governor(&self, caller: AccountId, operation: &'static str) -> Result<()> {
        if !self.is_governor(&caller) {
            warn!(%caller, operation, "Rejected governance call from non-governor");
            return Err(AmmError::NotGovernor(caller));
        }
        Ok(())
    }

    pub fn set_fee(&self, caller: AccountId, new_fee_bps: u32) -> Result<()> {
        let _call = self.guard.enter("set_fee")?;
        self.ensure_governor(caller, "set_fee")?;
        if new_fee_bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFee(new_fee_bps));
        }

        let old_fee_bps = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.fee_bps, new_fee_bps)
        };
        info!(%caller, old_fee_bps, new_fee_bps, "Fee updated");
        self.emit(PoolEvent::FeeUpdated {
            governor: caller,
            old_fee_bps,
            new_fee_bps,
        });
        Ok(())
    }

    pub fn set_twap_interval(&self, caller: AccountId, new_interval_secs: u64) -> Result<()> {
        let _call = self.guard.enter("set_twap_interval")?;
        self.ensure_governor(caller, "set_twap_interval")?;

        let old_interval_secs = {
            let mut state = self.state.lock();
            let old = state.twap.interval_secs();
            state.twap.set_interval(new_interval_secs);
            old
        };
        info!(%caller, old_interval_secs, new_interval_secs, "TWAP interval updated");
        self.emit(PoolEvent::TwapIntervalUpdated {
            governor: caller,
            old_interval_secs,
            new_interval_secs,
        });
        Ok(())
    }

    pub fn add_governor(&self, caller: AccountId, account: AccountId) -> Result<()> {
        let _call = self.guard.enter("add_governor")?;
        self.ensure_governor(caller, "add_governor")?;

        self.state.lock().governors.insert(account)?;
        info!(%caller, added = %account, "Governor added");
        self.emit(PoolEvent::GovernorAdded {
            governor: caller,
            added: account,
        });
        Ok(())
    }

    /// Removing the last governor is permitted and freezes all governed parameters
    pub fn remove_governor(&self, caller: AccountId, account: AccountId) -> Result<()> {
        let _call = self.guard.enter("remove_governor")?;
        self.ensure_governor(caller, "remove_governor")?;

        let remaining = {
            let mut state = self.state.lock();
            state.governors.remove(&account)?;
            state.governors.len()
        };
        if remaining == 0 {
            warn!(%caller, removed = %account, "Last governor removed; governance is now frozen");
        } else {
            info!(%caller, removed = %account, remaining, "Governor removed");
        }
        self.emit(PoolEvent::GovernorRemoved {
            governor: caller,
            removed: account,
        });
        Ok(())
    }
}
