//! # Domain Errors
//!
//! Error taxonomy for the registry. Every variant belongs to exactly one
//! [`ErrorKind`], which is the stable machine-readable part of the error;
//! the `Display` text is the human-readable reason.
//!
//! A rejected command never mutates state, so callers can resubmit a
//! corrected command without cleanup.

use super::value_objects::{Dpid, Fee, Principal, SequenceId};
use crate::ports::outbound::TreasuryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input or reference to something that does not exist.
    Validation,
    /// Fee below the required amount, or payout failure.
    Payment,
    /// Caller lacks the required role or capability.
    Authorization,
    /// Operation is illegal in the current lifecycle state.
    State,
}

impl ErrorKind {
    /// Machine-readable code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Payment => "payment",
            Self::Authorization => "authorization",
            Self::State => "state",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------
    /// Prefix failed charset or length validation.
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// Offending prefix.
        prefix: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Prefix is reserved and can never be registered.
    #[error("prefix {0:?} is reserved")]
    PrefixReserved(String),

    /// Prefix already has a registrant.
    #[error("prefix {0:?} is already taken")]
    PrefixTaken(String),

    /// Namespace has not been registered.
    #[error("unknown namespace {0:?}")]
    UnknownNamespace(String),

    /// No entry at this sequence id.
    #[error("entry not found: {prefix:?}/{sequence_id}")]
    EntryNotFound {
        /// Namespace prefix.
        prefix: String,
        /// Requested sequence id.
        sequence_id: SequenceId,
    },

    /// dPID is unallocated.
    #[error("unknown dpid {0}")]
    UnknownDpid(Dpid),

    /// Content object has never been imported.
    #[error("unknown content object {0:?}")]
    UnknownContentObject(String),

    /// Migration record failed validation.
    #[error("invalid migration record #{index}: {reason}")]
    InvalidRecord {
        /// Position in the batch.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    // ------------------------------------------------------------------
    // Payment
    // ------------------------------------------------------------------
    /// Attached fee is below the requirement.
    #[error("insufficient fee: required {required}, provided {provided}")]
    InsufficientFee {
        /// Required fee.
        required: Fee,
        /// Fee supplied with the call.
        provided: Fee,
    },

    /// Treasury refused the withdrawal.
    #[error("fee payout failed: {0}")]
    PayoutFailed(#[from] TreasuryError),

    // ------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------
    /// Caller is not the namespace registrant.
    #[error("caller {caller} is not the registrant of {prefix:?}")]
    NotRegistrant {
        /// Namespace prefix.
        prefix: String,
        /// Rejected caller.
        caller: Principal,
    },

    /// Caller holds none of the namespace's gate tokens.
    #[error("caller {caller} holds no gate token for {prefix:?}")]
    GateDenied {
        /// Namespace prefix.
        prefix: String,
        /// Rejected caller.
        caller: Principal,
    },

    /// Operation is restricted to the registry administrator.
    #[error("caller {0} is not the registry administrator")]
    NotAdministrator(Principal),

    /// Caller is not the legacy owner of the dPID.
    #[error("unauthorized upgrade of dpid {dpid} by {caller}")]
    UnauthorizedUpgrade {
        /// Target dPID.
        dpid: Dpid,
        /// Rejected caller.
        caller: Principal,
    },

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------
    /// dPID is already live.
    #[error("dpid {0} already upgraded")]
    AlreadyUpgraded(Dpid),

    /// Upgrade target was never minted or imported.
    #[error("unknown dpid {0}: nothing to upgrade")]
    UpgradeUnknownDpid(Dpid),

    /// Import names a dPID that is already live.
    #[error("dpid {0} re-imported inconsistently: already live")]
    LegacyConflict(Dpid),

    /// Registry has not been initialized.
    #[error("registry not initialized")]
    NotInitialized,

    /// `initialize` was called twice.
    #[error("registry already initialized")]
    AlreadyInitialized,

    /// A monotonic counter cannot advance any further.
    #[error("{0} counter exhausted")]
    CounterExhausted(&'static str),
}

impl RegistryError {
    /// Stable classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPrefix { .. }
            | Self::PrefixReserved(_)
            | Self::PrefixTaken(_)
            | Self::UnknownNamespace(_)
            | Self::EntryNotFound { .. }
            | Self::UnknownDpid(_)
            | Self::UnknownContentObject(_)
            | Self::InvalidRecord { .. } => ErrorKind::Validation,
            Self::InsufficientFee { .. } | Self::PayoutFailed(_) => ErrorKind::Payment,
            Self::NotRegistrant { .. }
            | Self::GateDenied { .. }
            | Self::NotAdministrator(_)
            | Self::UnauthorizedUpgrade { .. } => ErrorKind::Authorization,
            Self::AlreadyUpgraded(_)
            | Self::UpgradeUnknownDpid(_)
            | Self::LegacyConflict(_)
            | Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::CounterExhausted(_) => ErrorKind::State,
        }
    }
}
