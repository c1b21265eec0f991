//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the registry consumes but does not own:
//! - capability-token ownership (backs the access gate)
//! - fee treasury (receives withdrawn fees)
//!
//! Both are called from inside a command, so they are synchronous. An
//! adapter fronting a remote service must answer from a view consistent
//! with the command being applied.

use crate::domain::{Fee, GateToken, Principal};
use thiserror::Error;

/// Answers whether a principal holds a capability token.
pub trait TokenOwnershipOracle: Send + Sync {
    /// Number of units of `token` held by `holder`.
    fn balance_of(&self, token: &GateToken, holder: &Principal) -> u64;
}

/// Why a treasury refused a payout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreasuryError {
    /// Treasury is not accepting credits.
    #[error("treasury frozen")]
    Frozen,

    /// Credit would overflow the recipient's balance.
    #[error("balance overflow for {0}")]
    BalanceOverflow(Principal),

    /// Backing service could not be reached.
    #[error("treasury unavailable: {0}")]
    Unavailable(String),
}

/// Receives fee payouts.
pub trait FeeTreasury: Send + Sync {
    /// Credit `amount` to `recipient`. An error aborts the withdrawal.
    fn credit(&self, recipient: &Principal, amount: Fee) -> Result<(), TreasuryError>;
}

// =============================================================================
// Fixed Implementations for Testing
// =============================================================================

/// Oracle under which nobody holds any token.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTokens;

impl TokenOwnershipOracle for NoTokens {
    fn balance_of(&self, _token: &GateToken, _holder: &Principal) -> u64 {
        0
    }
}

/// Treasury that accepts and drops every payout.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardTreasury;

impl FeeTreasury for DiscardTreasury {
    fn credit(&self, _recipient: &Principal, _amount: Fee) -> Result<(), TreasuryError> {
        Ok(())
    }
}
