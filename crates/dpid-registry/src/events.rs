//! # Event Schema
//!
//! Domain events emitted by committed registry commands, and the
//! append-only log they are recorded in.
//!
//! Events are produced only by commands that commit. A rejected command
//! emits nothing, so the log is an exact history of state transitions.

use crate::domain::{
    ContentObjectId, ContentPointer, Dpid, Fee, GateToken, Prefix, Principal, SequenceId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DOMAIN EVENTS
// =============================================================================

/// Events emitted by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    /// One-shot initialization completed.
    Initialized {
        /// Registry administrator.
        administrator: Principal,
        /// First dPID the alias counter mints.
        first_dpid: u64,
    },

    /// A namespace was registered or auto-reserved.
    NamespaceRegistered {
        /// Namespace prefix.
        prefix: Prefix,
        /// Owner of the namespace.
        registrant: Principal,
        /// Initial gate set.
        gate_tokens: BTreeSet<GateToken>,
    },

    /// A namespace's gate set was replaced.
    NamespaceGateUpdated {
        /// Namespace prefix.
        prefix: Prefix,
        /// New gate set.
        gate_tokens: BTreeSet<GateToken>,
    },

    /// An entry was appended to a namespace.
    EntryRegistered {
        /// Namespace prefix.
        prefix: Prefix,
        /// Assigned sequence id.
        sequence_id: SequenceId,
    },

    /// A fresh dPID was minted.
    AliasMinted {
        /// Minted dPID.
        dpid: Dpid,
        /// Bound pointer.
        content_pointer: ContentPointer,
    },

    /// A legacy dPID became live.
    AliasUpgraded {
        /// Upgraded dPID.
        dpid: Dpid,
        /// New current pointer.
        content_pointer: ContentPointer,
    },

    /// A dPID was bound in the legacy table.
    LegacyImported {
        /// Imported dPID.
        dpid: Dpid,
        /// Principal allowed to upgrade it.
        owner: Principal,
    },

    /// A content object's pointer changed.
    PointerUpdated {
        /// Author of the version.
        principal: Principal,
        /// Content object.
        content_object_id: ContentObjectId,
        /// New pointer.
        content_pointer: ContentPointer,
    },

    /// A historical version was replayed.
    VersionMigrated {
        /// Author of the version.
        principal: Principal,
        /// Content object.
        content_object_id: ContentObjectId,
        /// Version pointer.
        content_pointer: ContentPointer,
        /// Original timestamp.
        timestamp: u64,
    },

    /// Collected fees were paid out.
    FeesWithdrawn {
        /// Recipient (the administrator).
        recipient: Principal,
        /// Amount paid out.
        amount: Fee,
    },
}

impl RegistryEvent {
    /// Topic the event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Initialized { .. } | Self::FeesWithdrawn { .. } => topics::ADMIN,
            Self::NamespaceRegistered { .. } | Self::NamespaceGateUpdated { .. } => {
                topics::NAMESPACES
            }
            Self::EntryRegistered { .. } => topics::ENTRIES,
            Self::AliasMinted { .. } | Self::AliasUpgraded { .. } => topics::ALIASES,
            Self::LegacyImported { .. }
            | Self::PointerUpdated { .. }
            | Self::VersionMigrated { .. } => topics::MIGRATION,
        }
    }
}

/// An event with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Zero-based position in the log.
    pub offset: u64,
    /// The event.
    pub event: RegistryEvent,
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Append-only log of committed events.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<RecordedEvent>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed batch, returning the recorded entries.
    pub fn append(&mut self, events: Vec<RegistryEvent>) -> Vec<RecordedEvent> {
        let start = self.entries.len();
        for event in events {
            let offset = self.entries.len() as u64;
            self.entries.push(RecordedEvent { offset, event });
        }
        self.entries[start..].to_vec()
    }

    /// Entries at or after `offset`.
    #[must_use]
    pub fn since(&self, offset: u64) -> &[RecordedEvent] {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        &self.entries[start..]
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Event topics for the registry.
pub mod topics {
    /// Initialization and fee withdrawal.
    pub const ADMIN: &str = "dpid_registry.admin";

    /// Namespace registration and gate changes.
    pub const NAMESPACES: &str = "dpid_registry.namespaces";

    /// Sequential entry allocation.
    pub const ENTRIES: &str = "dpid_registry.entries";

    /// Alias minting and upgrades.
    pub const ALIASES: &str = "dpid_registry.aliases";

    /// Legacy migration replay.
    pub const MIGRATION: &str = "dpid_registry.migration";
}
