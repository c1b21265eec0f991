//! # Domain Entities
//!
//! Records held by the registry components.

use super::value_objects::{ContentObjectId, ContentPointer, Dpid, Fee, GateToken, Prefix, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered namespace ("organization").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace prefix.
    pub prefix: Prefix,
    /// Permanent owner.
    pub registrant: Principal,
    /// Gate tokens; empty means anyone may write.
    pub gate_tokens: BTreeSet<GateToken>,
}

impl Namespace {
    /// True when writes require a gate token.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        !self.gate_tokens.is_empty()
    }
}

/// Lifecycle of a dPID.
///
/// `Unallocated -> Live` (mint) or `Unallocated -> Legacy -> Live`
/// (import, then upgrade). No other transition is legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DpidState {
    /// Never minted nor imported.
    #[default]
    Unallocated,
    /// Imported from the legacy registry, not yet upgraded.
    Legacy,
    /// Minted, or upgraded from legacy.
    Live,
}

impl DpidState {
    /// Check if transition to next state is valid.
    #[must_use]
    pub fn can_transition_to(self, next: DpidState) -> bool {
        matches!(
            (self, next),
            (Self::Unallocated, Self::Live)
                | (Self::Unallocated, Self::Legacy)
                | (Self::Legacy, Self::Live)
        )
    }
}

/// One historical version of a legacy dPID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyVersion {
    /// Pointer recorded for this version.
    pub content_pointer: ContentPointer,
    /// Original timestamp of the version.
    pub timestamp: u64,
}

/// Pre-migration history of a dPID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDpidEntry {
    /// Only principal allowed to upgrade the dPID.
    pub owner: Principal,
    /// Content object the dPID was first bound to.
    pub content_object_id: ContentObjectId,
    /// Versions in import order.
    pub versions: Vec<LegacyVersion>,
}

impl LegacyDpidEntry {
    /// Most recently imported version.
    #[must_use]
    pub fn latest(&self) -> Option<&LegacyVersion> {
        self.versions.last()
    }
}

/// Migrated content object (a legacy stream).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentObject {
    /// Creator of the first imported version.
    pub owner: Principal,
    /// Pointer of the last imported version.
    pub current_pointer: ContentPointer,
}

/// One historical version record fed to the migration importer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
    /// Principal that authored the version.
    pub from: Principal,
    /// Content object the version belongs to.
    pub content_object_id: ContentObjectId,
    /// Legacy dPID the version was published under.
    pub dpid: Dpid,
    /// Original timestamp.
    pub timestamp: u64,
    /// Pointer of this version.
    pub content_pointer: ContentPointer,
}

/// Parameters of the one-shot initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    /// First dPID the alias counter will mint.
    pub first_dpid: u64,
    /// Fee required to register a namespace.
    pub namespace_fee: Fee,
    /// Fee required to put an entry.
    pub entry_fee: Fee,
}
