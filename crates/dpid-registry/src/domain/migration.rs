//! # Legacy Migration Importer
//!
//! Replays an ordered batch of historical version records into the alias
//! registry's legacy table and the content-object table.
//!
//! ## Rules per record (input order)
//!
//! 1. Content object: created with owner = author on first sight; pointer
//!    always overwritten (last writer wins).
//! 2. dPID: bound to the record's object on first sight (first writer
//!    wins); the version is appended either way.
//! 3. Events: `PointerUpdated` then `VersionMigrated`.
//!
//! The batch is validated in full before the first mutation, so a bad
//! record anywhere rejects the whole batch with nothing applied.

use super::alias_registry::AliasRegistry;
use super::entities::{ContentObject, DpidState, LegacyRecord, LegacyVersion};
use super::errors::RegistryError;
use super::prefix_directory::PrefixDirectory;
use super::value_objects::{ContentObjectId, Prefix, Principal};
use crate::events::RegistryEvent;
use std::collections::HashMap;
use tracing::{info, warn};

/// Owns the content-object table and applies migration batches.
#[derive(Debug, Default)]
pub struct LegacyMigrationImporter {
    content_objects: HashMap<ContentObjectId, ContentObject>,
}

impl LegacyMigrationImporter {
    /// Create an importer with an empty content-object table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Imported content object, if any.
    #[must_use]
    pub fn content_object(&self, id: &ContentObjectId) -> Option<&ContentObject> {
        self.content_objects.get(id)
    }

    /// Number of known content objects.
    #[must_use]
    pub fn content_object_count(&self) -> usize {
        self.content_objects.len()
    }

    /// Apply a migration batch atomically. Administrator only.
    ///
    /// Returns the number of records applied.
    #[allow(clippy::too_many_arguments)]
    pub fn import_batch(
        &mut self,
        caller: Principal,
        admin: Principal,
        records: &[LegacyRecord],
        default_prefix: &str,
        aliases: &mut AliasRegistry,
        directory: &mut PrefixDirectory,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<usize, RegistryError> {
        if caller != admin {
            return Err(RegistryError::NotAdministrator(caller));
        }
        let default_prefix = Prefix::parse(default_prefix)?;
        Self::validate(records, aliases)?;

        if directory.reserve_for(admin, &default_prefix, events) {
            info!(prefix = %default_prefix, "Default prefix reserved for migration");
        }

        for record in records {
            self.apply_record(record, aliases, events);
        }

        info!(
            records = records.len(),
            content_objects = self.content_objects.len(),
            "Legacy batch imported"
        );
        Ok(records.len())
    }

    fn validate(records: &[LegacyRecord], aliases: &AliasRegistry) -> Result<(), RegistryError> {
        for (index, record) in records.iter().enumerate() {
            if record.content_object_id.is_empty() {
                return Err(RegistryError::InvalidRecord {
                    index,
                    reason: "empty content object id".to_string(),
                });
            }
            if aliases.state(record.dpid) == DpidState::Live {
                return Err(RegistryError::LegacyConflict(record.dpid));
            }
        }
        Ok(())
    }

    fn apply_record(
        &mut self,
        record: &LegacyRecord,
        aliases: &mut AliasRegistry,
        events: &mut Vec<RegistryEvent>,
    ) {
        self.content_objects
            .entry(record.content_object_id.clone())
            .and_modify(|object| object.current_pointer = record.content_pointer.clone())
            .or_insert_with(|| ContentObject {
                owner: record.from,
                current_pointer: record.content_pointer.clone(),
            });

        if !aliases.bind_legacy(record.dpid, record.from, &record.content_object_id, events) {
            if let Some((_, bound)) = aliases.legacy_binding(record.dpid) {
                if *bound != record.content_object_id {
                    warn!(
                        dpid = record.dpid.value(),
                        bound = %bound,
                        record_object = %record.content_object_id,
                        "Record names a different content object for an already bound dpid; binding kept"
                    );
                }
            }
        }
        aliases.append_legacy_version(
            record.dpid,
            LegacyVersion {
                content_pointer: record.content_pointer.clone(),
                timestamp: record.timestamp,
            },
        );

        events.push(RegistryEvent::PointerUpdated {
            principal: record.from,
            content_object_id: record.content_object_id.clone(),
            content_pointer: record.content_pointer.clone(),
        });
        events.push(RegistryEvent::VersionMigrated {
            principal: record.from,
            content_object_id: record.content_object_id.clone(),
            content_pointer: record.content_pointer.clone(),
            timestamp: record.timestamp,
        });
    }
}
