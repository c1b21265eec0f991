//! # Alias Registry
//!
//! Flat dPID namespace backed by one global counter, plus the legacy
//! bridge table filled by migration.
//!
//! State per dPID is derived from the two tables:
//!
//! | `live` | `legacy` | State |
//! |--------|----------|-------|
//! | no     | no       | Unallocated |
//! | no     | yes      | Legacy |
//! | yes    | any      | Live |
//!
//! Legacy entries are never removed, so history stays queryable after an
//! upgrade.

use super::entities::{DpidState, LegacyDpidEntry, LegacyVersion};
use super::errors::RegistryError;
use super::value_objects::{ContentObjectId, ContentPointer, Dpid, Principal};
use crate::events::RegistryEvent;
use std::collections::HashMap;
use tracing::info;

/// Global dPID counter and alias tables.
#[derive(Debug)]
pub struct AliasRegistry {
    first_dpid: u64,
    next_dpid: u64,
    live: HashMap<Dpid, ContentPointer>,
    legacy: HashMap<Dpid, LegacyDpidEntry>,
}

impl AliasRegistry {
    /// Create a registry whose first minted dPID is `first_dpid`.
    #[must_use]
    pub fn new(first_dpid: u64) -> Self {
        Self {
            first_dpid,
            next_dpid: first_dpid,
            live: HashMap::new(),
            legacy: HashMap::new(),
        }
    }

    /// First dPID of the minting range.
    #[must_use]
    pub fn first_dpid(&self) -> u64 {
        self.first_dpid
    }

    /// dPID the next mint will return.
    #[must_use]
    pub fn next_dpid(&self) -> Dpid {
        Dpid(self.next_free().unwrap_or(u64::MAX))
    }

    /// First counter value at or after `next_dpid` with no legacy binding.
    fn next_free(&self) -> Result<u64, RegistryError> {
        let mut candidate = self.next_dpid;
        while self.legacy.contains_key(&Dpid(candidate)) {
            candidate = candidate
                .checked_add(1)
                .ok_or(RegistryError::CounterExhausted("dpid"))?;
        }
        Ok(candidate)
    }

    /// Current lifecycle state of `dpid`.
    #[must_use]
    pub fn state(&self, dpid: Dpid) -> DpidState {
        if self.live.contains_key(&dpid) {
            DpidState::Live
        } else if self.legacy.contains_key(&dpid) {
            DpidState::Legacy
        } else {
            DpidState::Unallocated
        }
    }

    /// Mint the next dPID and bind it to `content_pointer`.
    ///
    /// dPIDs already bound by a legacy import are skipped.
    pub fn mint(
        &mut self,
        content_pointer: ContentPointer,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<Dpid, RegistryError> {
        let candidate = self.next_free()?;
        let dpid = Dpid(candidate);
        let next = candidate
            .checked_add(1)
            .ok_or(RegistryError::CounterExhausted("dpid"))?;

        self.live.insert(dpid, content_pointer.clone());
        self.next_dpid = next;

        info!(dpid = dpid.value(), pointer = %content_pointer, "Alias minted");
        events.push(RegistryEvent::AliasMinted {
            dpid,
            content_pointer,
        });
        Ok(dpid)
    }

    /// Current pointer of `dpid`.
    ///
    /// A legacy dPID resolves to its most recently imported version.
    pub fn resolve(&self, dpid: Dpid) -> Result<&ContentPointer, RegistryError> {
        if let Some(pointer) = self.live.get(&dpid) {
            return Ok(pointer);
        }
        self.legacy
            .get(&dpid)
            .and_then(LegacyDpidEntry::latest)
            .map(|version| &version.content_pointer)
            .ok_or(RegistryError::UnknownDpid(dpid))
    }

    /// Legacy history of `dpid`, whether or not it has been upgraded.
    pub fn lookup_legacy(&self, dpid: Dpid) -> Result<&LegacyDpidEntry, RegistryError> {
        self.legacy
            .get(&dpid)
            .ok_or(RegistryError::UnknownDpid(dpid))
    }

    /// Promote a legacy dPID to live. Legacy owner only, once.
    pub fn upgrade(
        &mut self,
        caller: Principal,
        dpid: Dpid,
        new_pointer: ContentPointer,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<(), RegistryError> {
        match self.state(dpid) {
            DpidState::Unallocated => return Err(RegistryError::UpgradeUnknownDpid(dpid)),
            DpidState::Live => return Err(RegistryError::AlreadyUpgraded(dpid)),
            DpidState::Legacy => {}
        }
        let owner = self.lookup_legacy(dpid)?.owner;
        if caller != owner {
            return Err(RegistryError::UnauthorizedUpgrade { dpid, caller });
        }

        self.live.insert(dpid, new_pointer.clone());

        info!(dpid = dpid.value(), owner = %owner, pointer = %new_pointer, "Alias upgraded");
        events.push(RegistryEvent::AliasUpgraded {
            dpid,
            content_pointer: new_pointer,
        });
        Ok(())
    }

    /// Legacy binding of `dpid`, if it has one.
    pub(crate) fn legacy_binding(&self, dpid: Dpid) -> Option<(&Principal, &ContentObjectId)> {
        self.legacy
            .get(&dpid)
            .map(|entry| (&entry.owner, &entry.content_object_id))
    }

    /// Bind `dpid` in the legacy table unless already bound.
    ///
    /// Returns `true` if a new binding was created. Callers have already
    /// ruled out live dPIDs.
    pub(crate) fn bind_legacy(
        &mut self,
        dpid: Dpid,
        owner: Principal,
        content_object_id: &ContentObjectId,
        events: &mut Vec<RegistryEvent>,
    ) -> bool {
        if self.legacy.contains_key(&dpid) {
            return false;
        }
        self.legacy.insert(
            dpid,
            LegacyDpidEntry {
                owner,
                content_object_id: content_object_id.clone(),
                versions: Vec::new(),
            },
        );
        events.push(RegistryEvent::LegacyImported { dpid, owner });
        true
    }

    /// Append a version to an already bound legacy dPID.
    pub(crate) fn append_legacy_version(&mut self, dpid: Dpid, version: LegacyVersion) {
        if let Some(entry) = self.legacy.get_mut(&dpid) {
            entry.versions.push(version);
        }
    }
}
