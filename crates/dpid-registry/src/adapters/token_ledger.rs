//! Token Ledger Adapter
//!
//! Implements `TokenOwnershipOracle` over an in-memory balance table.

use crate::domain::{GateToken, Principal};
use crate::ports::outbound::TokenOwnershipOracle;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory capability-token balances.
///
/// In production this would front the token contract's ownership query.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    balances: RwLock<HashMap<(GateToken, Principal), u64>>,
}

impl InMemoryTokenLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `holder` `amount` more units of `token`.
    pub fn grant(&self, token: GateToken, holder: Principal, amount: u64) {
        let mut balances = self.balances.write();
        let balance = balances.entry((token, holder)).or_insert(0);
        *balance = balance.saturating_add(amount);
        debug!(token = %token, holder = %holder, balance = *balance, "Token granted");
    }

    /// Remove every unit of `token` held by `holder`.
    pub fn revoke(&self, token: GateToken, holder: Principal) {
        self.balances.write().remove(&(token, holder));
        debug!(token = %token, holder = %holder, "Token revoked");
    }
}

impl TokenOwnershipOracle for InMemoryTokenLedger {
    fn balance_of(&self, token: &GateToken, holder: &Principal) -> u64 {
        self.balances
            .read()
            .get(&(*token, *holder))
            .copied()
            .unwrap_or(0)
    }
}
