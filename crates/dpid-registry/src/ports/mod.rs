//! Ports Layer
//!
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - token ownership and fee payout

pub mod inbound;
pub mod outbound;

pub use inbound::DpidRegistryApi;
pub use outbound::{DiscardTreasury, FeeTreasury, NoTokens, TokenOwnershipOracle, TreasuryError};
