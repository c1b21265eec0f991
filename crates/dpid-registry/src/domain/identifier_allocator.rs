//! # Identifier Allocator
//!
//! Per-namespace sequential entries. A namespace's counter is the length of
//! its entry list, so ids are contiguous from 0 and can never be reused.

use super::access_gate::AccessGate;
use super::errors::RegistryError;
use super::invariants::check_fee;
use super::prefix_directory::{FeeVault, PrefixDirectory};
use super::value_objects::{ContentPointer, Fee, Prefix, Principal, SequenceId};
use crate::events::RegistryEvent;
use std::collections::HashMap;
use tracing::info;

/// Binds `(prefix, sequence_id)` to content pointers.
#[derive(Debug)]
pub struct IdentifierAllocator {
    entries: HashMap<Prefix, Vec<ContentPointer>>,
    entry_fee: Fee,
}

impl IdentifierAllocator {
    /// Create an allocator charging `entry_fee` per entry.
    #[must_use]
    pub fn new(entry_fee: Fee) -> Self {
        Self {
            entries: HashMap::new(),
            entry_fee,
        }
    }

    /// Fee required to put an entry.
    #[must_use]
    pub fn entry_fee(&self) -> Fee {
        self.entry_fee
    }

    /// Number of entries allocated under `prefix`.
    #[must_use]
    pub fn entry_count(&self, prefix: &str) -> u64 {
        self.entries.get(prefix).map_or(0, |list| list.len() as u64)
    }

    /// Append `content_pointer` to the namespace and return its sequence id.
    ///
    /// Checks run in order: namespace exists, fee, gate.
    #[allow(clippy::too_many_arguments)]
    pub fn put_entry(
        &mut self,
        directory: &PrefixDirectory,
        gate: &AccessGate,
        caller: Principal,
        prefix: &str,
        content_pointer: ContentPointer,
        fee: Fee,
        vault: &mut FeeVault,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<SequenceId, RegistryError> {
        let namespace = directory
            .get(prefix)
            .ok_or_else(|| RegistryError::UnknownNamespace(prefix.to_string()))?;
        check_fee(self.entry_fee, fee)?;
        if namespace.is_gated() && !gate.holds_any(&caller, &namespace.gate_tokens) {
            return Err(RegistryError::GateDenied {
                prefix: prefix.to_string(),
                caller,
            });
        }
        let new_balance = vault.balance_after_deposit(fee)?;

        let list = self.entries.entry(namespace.prefix.clone()).or_default();
        let sequence_id = list.len() as SequenceId;
        list.push(content_pointer);
        vault.set_balance(new_balance);

        info!(prefix = %namespace.prefix, sequence_id, caller = %caller, "Entry registered");
        events.push(RegistryEvent::EntryRegistered {
            prefix: namespace.prefix.clone(),
            sequence_id,
        });
        Ok(sequence_id)
    }

    /// Pointer stored at `(prefix, sequence_id)`.
    pub fn get_entry(
        &self,
        prefix: &str,
        sequence_id: SequenceId,
    ) -> Result<&ContentPointer, RegistryError> {
        self.entries
            .get(prefix)
            .and_then(|list| usize::try_from(sequence_id).ok().and_then(|i| list.get(i)))
            .ok_or_else(|| RegistryError::EntryNotFound {
                prefix: prefix.to_string(),
                sequence_id,
            })
    }
}
