//! # dPID Registry
//!
//! Persistent-identifier registry with two identifier schemes and a legacy
//! migration path.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - **Namespaced identifiers:** `(prefix, sequence_id)` pairs allocated
//!   sequentially inside fee-paid, optionally token-gated namespaces
//! - **Flat dPIDs:** globally numbered aliases minted from one counter
//! - **Legacy migration:** ordered replay of historical version records
//!   into a bridge table, with owner-only one-shot upgrade to live
//!
//! ## Invariants
//!
//! | Invariant | Enforced by |
//! |-----------|-------------|
//! | A prefix is registered at most once, registrant never changes | `PrefixDirectory` |
//! | Sequence ids are contiguous from 0 per namespace, never reused | `IdentifierAllocator` |
//! | Minted dPIDs are strictly increasing, never reused | `AliasRegistry` |
//! | Minting never returns a legacy-bound dPID | `AliasRegistry` |
//! | Only the legacy owner upgrades, at most once | `AliasRegistry` |
//! | A rejected command changes nothing | every component (validate, then mutate) |
//!
//! ## Module Structure
//!
//! ```text
//! dpid-registry/
//! ├── domain/          # Components, entities, errors, Registry::apply
//! ├── ports/           # DpidRegistryApi + token oracle / treasury traits
//! ├── adapters/        # In-memory ledger, treasury, event bus
//! ├── events.rs        # RegistryEvent, topics, offset-addressed log
//! ├── config.rs        # RegistryConfig::from_env
//! └── service.rs       # Single-writer async service
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use dpid_registry::prelude::*;
//!
//! let service = RegistryService::bootstrap(config, admin, oracle, treasury).await?;
//! let dpid = service.mint_alias(alice, "bafy...".into()).await?;
//! assert_eq!(service.resolve_alias(dpid).await?.as_str(), "bafy...");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{EventFilter, InMemoryEventBus, InMemoryTokenLedger, InMemoryTreasury, Subscription};
pub use config::RegistryConfig;
pub use domain::{
    Command, CommandResult, ContentObject, ContentObjectId, ContentPointer, Dpid, DpidState,
    ErrorKind, Fee, GateToken, InitParams, LegacyDpidEntry, LegacyRecord, LegacyVersion,
    Namespace, Prefix, Principal, Registry, RegistryError, SequenceId, MAX_PREFIX_LEN,
    RESERVED_PREFIXES,
};
pub use events::{topics, EventLog, RecordedEvent, RegistryEvent};
pub use ports::{DpidRegistryApi, FeeTreasury, TokenOwnershipOracle, TreasuryError};
pub use service::{RegistryService, ServiceStats};

/// Commonly used types.
pub mod prelude {
    pub use crate::adapters::{EventFilter, InMemoryTokenLedger, InMemoryTreasury};
    pub use crate::config::RegistryConfig;
    pub use crate::domain::{
        Command, CommandResult, ContentPointer, Dpid, DpidState, ErrorKind, GateToken,
        InitParams, LegacyRecord, Principal, RegistryError,
    };
    pub use crate::events::{RecordedEvent, RegistryEvent};
    pub use crate::ports::DpidRegistryApi;
    pub use crate::service::RegistryService;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
