//! # Access Gate
//!
//! Capability check backed by an injected token-ownership oracle.

use super::value_objects::{GateToken, Principal};
use crate::ports::outbound::TokenOwnershipOracle;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Asks the oracle whether a caller holds at least one gate token.
#[derive(Clone)]
pub struct AccessGate {
    oracle: Arc<dyn TokenOwnershipOracle>,
}

impl AccessGate {
    /// Create a gate over `oracle`.
    pub fn new(oracle: Arc<dyn TokenOwnershipOracle>) -> Self {
        Self { oracle }
    }

    /// True if `caller` holds at least one of `tokens`.
    ///
    /// Always false for an empty set.
    #[must_use]
    pub fn holds_any(&self, caller: &Principal, tokens: &BTreeSet<GateToken>) -> bool {
        tokens
            .iter()
            .any(|token| self.oracle.balance_of(token, caller) > 0)
    }

    /// True if `caller` may write under a gate set; empty sets are open.
    #[must_use]
    pub fn admits(&self, caller: &Principal, tokens: &BTreeSet<GateToken>) -> bool {
        tokens.is_empty() || self.holds_any(caller, tokens)
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}
