//! Treasury Adapter
//!
//! Implements `FeeTreasury` by crediting in-memory accounts.

use crate::domain::{Fee, Principal};
use crate::ports::outbound::{FeeTreasury, TreasuryError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// In-memory payout accounts.
#[derive(Debug, Default)]
pub struct InMemoryTreasury {
    balances: RwLock<HashMap<Principal, Fee>>,
    /// When set, every credit is refused.
    frozen: AtomicBool,
}

impl InMemoryTreasury {
    /// Create a treasury with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount credited to `account` so far.
    #[must_use]
    pub fn balance_of(&self, account: &Principal) -> Fee {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    /// Refuse (or accept again) all credits.
    pub fn set_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::SeqCst);
    }
}

impl FeeTreasury for InMemoryTreasury {
    fn credit(&self, recipient: &Principal, amount: Fee) -> Result<(), TreasuryError> {
        if self.frozen.load(Ordering::SeqCst) {
            warn!(recipient = %recipient, amount, "Treasury frozen, credit refused");
            return Err(TreasuryError::Frozen);
        }
        let mut balances = self.balances.write();
        let balance = balances.entry(*recipient).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TreasuryError::BalanceOverflow(*recipient))?;
        info!(recipient = %recipient, amount, "Treasury credited");
        Ok(())
    }
}
