//! # Inbound Ports
//!
//! API trait defining what the dPID registry can do.
//!
//! Every mutating call names its caller explicitly; identity resolution is
//! the host's job. Reads never fail on authorization.

use crate::domain::{
    ContentObject, ContentObjectId, ContentPointer, Dpid, DpidState, Fee, GateToken, InitParams,
    LegacyDpidEntry, LegacyRecord, Namespace, Principal, RegistryError, SequenceId,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// dPID registry API - inbound port.
#[async_trait]
pub trait DpidRegistryApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// One-shot initialization; `caller` becomes the administrator.
    async fn initialize(&self, caller: Principal, params: InitParams)
        -> Result<(), RegistryError>;

    // -------------------------------------------------------------------------
    // Namespaces and entries
    // -------------------------------------------------------------------------

    /// Register a namespace, optionally gated.
    async fn register_namespace(
        &self,
        caller: Principal,
        prefix: &str,
        gate_tokens: Option<BTreeSet<GateToken>>,
        fee: Fee,
    ) -> Result<Namespace, RegistryError>;

    /// Replace a namespace's gate set. Registrant only.
    async fn update_namespace_gate(
        &self,
        caller: Principal,
        prefix: &str,
        gate_tokens: BTreeSet<GateToken>,
    ) -> Result<(), RegistryError>;

    /// Append an entry to a namespace and return its sequence id.
    async fn put_entry(
        &self,
        caller: Principal,
        prefix: &str,
        content_pointer: ContentPointer,
        fee: Fee,
    ) -> Result<SequenceId, RegistryError>;

    /// Pointer stored at `(prefix, sequence_id)`.
    async fn get_entry(
        &self,
        prefix: &str,
        sequence_id: SequenceId,
    ) -> Result<ContentPointer, RegistryError>;

    /// Pay all collected fees to the administrator.
    async fn withdraw_fees(&self, caller: Principal) -> Result<Fee, RegistryError>;

    // -------------------------------------------------------------------------
    // Aliases
    // -------------------------------------------------------------------------

    /// Mint the next dPID. Open to anyone.
    async fn mint_alias(
        &self,
        caller: Principal,
        content_pointer: ContentPointer,
    ) -> Result<Dpid, RegistryError>;

    /// Current pointer of `dpid`.
    async fn resolve_alias(&self, dpid: Dpid) -> Result<ContentPointer, RegistryError>;

    /// Legacy history of `dpid`.
    async fn lookup_legacy(&self, dpid: Dpid) -> Result<LegacyDpidEntry, RegistryError>;

    /// Upgrade a legacy dPID to live. Legacy owner only, once.
    async fn upgrade_alias(
        &self,
        caller: Principal,
        dpid: Dpid,
        content_pointer: ContentPointer,
    ) -> Result<(), RegistryError>;

    // -------------------------------------------------------------------------
    // Migration
    // -------------------------------------------------------------------------

    /// Replay a migration batch. Administrator only; atomic.
    async fn import_legacy_batch(
        &self,
        caller: Principal,
        records: Vec<LegacyRecord>,
        default_prefix: &str,
    ) -> Result<usize, RegistryError>;

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Namespace registered under `prefix`.
    async fn namespace(&self, prefix: &str) -> Result<Namespace, RegistryError>;

    /// Imported content object.
    async fn content_object(&self, id: &ContentObjectId) -> Result<ContentObject, RegistryError>;

    /// Lifecycle state of `dpid`.
    async fn dpid_state(&self, dpid: Dpid) -> DpidState;

    /// Fees collected and not yet withdrawn.
    async fn collected_fees(&self) -> Fee;
}
