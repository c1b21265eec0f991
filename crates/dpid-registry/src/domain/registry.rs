//! # Registry State Machine
//!
//! Composes the components into one deterministic state machine:
//! `apply(state, caller, command) -> (state', events) | error`.
//!
//! Every operation either commits and returns its events, or returns an
//! error with state unchanged. The registry must be initialized exactly
//! once before any other command is accepted.

use super::access_gate::AccessGate;
use super::alias_registry::AliasRegistry;
use super::entities::{
    ContentObject, DpidState, InitParams, LegacyDpidEntry, LegacyRecord, Namespace,
};
use super::errors::RegistryError;
use super::identifier_allocator::IdentifierAllocator;
use super::migration::LegacyMigrationImporter;
use super::prefix_directory::{FeeVault, PrefixDirectory};
use super::value_objects::{
    ContentObjectId, ContentPointer, Dpid, Fee, GateToken, Principal, SequenceId,
};
use crate::events::RegistryEvent;
use crate::ports::outbound::{FeeTreasury, TokenOwnershipOracle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

// =============================================================================
// COMMANDS
// =============================================================================

/// Every state-changing operation, in replayable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// One-shot initialization; the caller becomes administrator.
    Initialize(InitParams),
    /// Register a namespace.
    RegisterNamespace {
        /// Requested prefix.
        prefix: String,
        /// Optional gate set; absent means open.
        #[serde(default)]
        gate_tokens: Option<BTreeSet<GateToken>>,
        /// Attached fee.
        fee: Fee,
    },
    /// Replace a namespace's gate set.
    UpdateNamespaceGate {
        /// Target prefix.
        prefix: String,
        /// New gate set.
        gate_tokens: BTreeSet<GateToken>,
    },
    /// Append an entry to a namespace.
    PutEntry {
        /// Target prefix.
        prefix: String,
        /// Pointer to store.
        content_pointer: ContentPointer,
        /// Attached fee.
        fee: Fee,
    },
    /// Mint a new dPID.
    MintAlias {
        /// Pointer to bind.
        content_pointer: ContentPointer,
    },
    /// Upgrade a legacy dPID to live.
    UpgradeAlias {
        /// Target dPID.
        dpid: Dpid,
        /// New pointer.
        content_pointer: ContentPointer,
    },
    /// Replay a migration batch.
    ImportLegacyBatch {
        /// Records in replay order.
        records: Vec<LegacyRecord>,
        /// Namespace reserved for the administrator on first sight.
        #[serde(default)]
        default_prefix: String,
    },
    /// Pay collected fees to the administrator.
    WithdrawFees,
}

impl Command {
    /// Operation name as it appears in the serialized `op` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize(_) => "initialize",
            Self::RegisterNamespace { .. } => "register_namespace",
            Self::UpdateNamespaceGate { .. } => "update_namespace_gate",
            Self::PutEntry { .. } => "put_entry",
            Self::MintAlias { .. } => "mint_alias",
            Self::UpgradeAlias { .. } => "upgrade_alias",
            Self::ImportLegacyBatch { .. } => "import_legacy_batch",
            Self::WithdrawFees => "withdraw_fees",
        }
    }
}

/// Value returned by a committed command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    /// Registry initialized.
    Initialized,
    /// Namespace registered.
    NamespaceRegistered(Namespace),
    /// Gate set replaced.
    GateUpdated,
    /// Entry allocated.
    EntryRegistered {
        /// Assigned sequence id.
        sequence_id: SequenceId,
    },
    /// dPID minted.
    AliasMinted {
        /// Minted dPID.
        dpid: Dpid,
    },
    /// dPID upgraded.
    AliasUpgraded,
    /// Migration batch applied.
    BatchImported {
        /// Records applied.
        records: usize,
    },
    /// Fees paid out.
    FeesWithdrawn {
        /// Amount paid.
        amount: Fee,
    },
}

/// A committed transition: its return value plus emitted events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed<T> {
    /// Operation result.
    pub value: T,
    /// Events in emission order.
    pub events: Vec<RegistryEvent>,
}

impl<T> Committed<T> {
    fn new(value: T, events: Vec<RegistryEvent>) -> Self {
        Self { value, events }
    }

    /// Map the value, keeping the events.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
        Committed {
            value: f(self.value),
            events: self.events,
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The complete registry state.
pub struct Registry {
    administrator: Option<Principal>,
    directory: PrefixDirectory,
    allocator: IdentifierAllocator,
    aliases: AliasRegistry,
    importer: LegacyMigrationImporter,
    vault: FeeVault,
    gate: AccessGate,
    treasury: Arc<dyn FeeTreasury>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("administrator", &self.administrator)
            .field("directory", &self.directory)
            .field("allocator", &self.allocator)
            .field("aliases", &self.aliases)
            .field("importer", &self.importer)
            .field("vault", &self.vault)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an uninitialized registry over its collaborators.
    pub fn new(oracle: Arc<dyn TokenOwnershipOracle>, treasury: Arc<dyn FeeTreasury>) -> Self {
        Self {
            administrator: None,
            directory: PrefixDirectory::new(0),
            allocator: IdentifierAllocator::new(0),
            aliases: AliasRegistry::new(0),
            importer: LegacyMigrationImporter::new(),
            vault: FeeVault::default(),
            gate: AccessGate::new(oracle),
            treasury,
        }
    }

    /// Apply one command as `caller`.
    pub fn apply(
        &mut self,
        caller: Principal,
        command: Command,
    ) -> Result<Committed<CommandResult>, RegistryError> {
        match command {
            Command::Initialize(params) => Ok(self
                .initialize(caller, params)?
                .map(|()| CommandResult::Initialized)),
            Command::RegisterNamespace {
                prefix,
                gate_tokens,
                fee,
            } => Ok(self
                .register_namespace(caller, &prefix, gate_tokens, fee)?
                .map(CommandResult::NamespaceRegistered)),
            Command::UpdateNamespaceGate {
                prefix,
                gate_tokens,
            } => Ok(self
                .update_namespace_gate(caller, &prefix, gate_tokens)?
                .map(|()| CommandResult::GateUpdated)),
            Command::PutEntry {
                prefix,
                content_pointer,
                fee,
            } => Ok(self
                .put_entry(caller, &prefix, content_pointer, fee)?
                .map(|sequence_id| CommandResult::EntryRegistered { sequence_id })),
            Command::MintAlias { content_pointer } => Ok(self
                .mint_alias(content_pointer)?
                .map(|dpid| CommandResult::AliasMinted { dpid })),
            Command::UpgradeAlias {
                dpid,
                content_pointer,
            } => Ok(self
                .upgrade_alias(caller, dpid, content_pointer)?
                .map(|()| CommandResult::AliasUpgraded)),
            Command::ImportLegacyBatch {
                records,
                default_prefix,
            } => Ok(self
                .import_legacy_batch(caller, &records, &default_prefix)?
                .map(|records| CommandResult::BatchImported { records })),
            Command::WithdrawFees => Ok(self
                .withdraw_fees(caller)?
                .map(|amount| CommandResult::FeesWithdrawn { amount })),
        }
    }

    fn admin(&self) -> Result<Principal, RegistryError> {
        self.administrator.ok_or(RegistryError::NotInitialized)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// One-shot initialization. `caller` becomes the administrator and is
    /// assigned every reserved prefix.
    pub fn initialize(
        &mut self,
        caller: Principal,
        params: InitParams,
    ) -> Result<Committed<()>, RegistryError> {
        if self.administrator.is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }

        let mut events = vec![RegistryEvent::Initialized {
            administrator: caller,
            first_dpid: params.first_dpid,
        }];
        self.directory = PrefixDirectory::new(params.namespace_fee);
        self.directory.reserve_defaults(caller, &mut events);
        self.allocator = IdentifierAllocator::new(params.entry_fee);
        self.aliases = AliasRegistry::new(params.first_dpid);
        self.administrator = Some(caller);

        info!(
            administrator = %caller,
            first_dpid = params.first_dpid,
            namespace_fee = params.namespace_fee,
            entry_fee = params.entry_fee,
            "Registry initialized"
        );
        Ok(Committed::new((), events))
    }

    /// True once `initialize` has committed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.administrator.is_some()
    }

    /// Registry administrator, once initialized.
    #[must_use]
    pub fn administrator(&self) -> Option<Principal> {
        self.administrator
    }

    // -------------------------------------------------------------------------
    // Prefix directory
    // -------------------------------------------------------------------------

    /// Register a namespace for `caller`.
    pub fn register_namespace(
        &mut self,
        caller: Principal,
        prefix: &str,
        gate_tokens: Option<BTreeSet<GateToken>>,
        fee: Fee,
    ) -> Result<Committed<Namespace>, RegistryError> {
        self.admin()?;
        let mut events = Vec::new();
        let namespace =
            self.directory
                .register(caller, prefix, gate_tokens, fee, &mut self.vault, &mut events)?;
        Ok(Committed::new(namespace, events))
    }

    /// Replace a namespace's gate set.
    pub fn update_namespace_gate(
        &mut self,
        caller: Principal,
        prefix: &str,
        gate_tokens: BTreeSet<GateToken>,
    ) -> Result<Committed<()>, RegistryError> {
        self.admin()?;
        let mut events = Vec::new();
        self.directory
            .update_gate(caller, prefix, gate_tokens, &mut events)?;
        Ok(Committed::new((), events))
    }

    /// Pay all collected fees to the administrator.
    pub fn withdraw_fees(&mut self, caller: Principal) -> Result<Committed<Fee>, RegistryError> {
        let admin = self.admin()?;
        let mut events = Vec::new();
        let amount = PrefixDirectory::withdraw_fees(
            caller,
            admin,
            &mut self.vault,
            self.treasury.as_ref(),
            &mut events,
        )?;
        Ok(Committed::new(amount, events))
    }

    /// Namespace registered under `prefix`.
    pub fn namespace(&self, prefix: &str) -> Result<&Namespace, RegistryError> {
        self.directory
            .get(prefix)
            .ok_or_else(|| RegistryError::UnknownNamespace(prefix.to_string()))
    }

    /// Fees collected and not yet withdrawn.
    #[must_use]
    pub fn collected_fees(&self) -> Fee {
        self.vault.balance()
    }

    // -------------------------------------------------------------------------
    // Identifier allocator
    // -------------------------------------------------------------------------

    /// Append an entry to a namespace.
    pub fn put_entry(
        &mut self,
        caller: Principal,
        prefix: &str,
        content_pointer: ContentPointer,
        fee: Fee,
    ) -> Result<Committed<SequenceId>, RegistryError> {
        self.admin()?;
        let mut events = Vec::new();
        let sequence_id = self.allocator.put_entry(
            &self.directory,
            &self.gate,
            caller,
            prefix,
            content_pointer,
            fee,
            &mut self.vault,
            &mut events,
        )?;
        Ok(Committed::new(sequence_id, events))
    }

    /// Pointer stored at `(prefix, sequence_id)`.
    pub fn get_entry(
        &self,
        prefix: &str,
        sequence_id: SequenceId,
    ) -> Result<&ContentPointer, RegistryError> {
        self.allocator.get_entry(prefix, sequence_id)
    }

    /// Number of entries allocated under `prefix`.
    #[must_use]
    pub fn entry_count(&self, prefix: &str) -> u64 {
        self.allocator.entry_count(prefix)
    }

    // -------------------------------------------------------------------------
    // Alias registry
    // -------------------------------------------------------------------------

    /// Mint the next dPID.
    pub fn mint_alias(
        &mut self,
        content_pointer: ContentPointer,
    ) -> Result<Committed<Dpid>, RegistryError> {
        self.admin()?;
        let mut events = Vec::new();
        let dpid = self.aliases.mint(content_pointer, &mut events)?;
        Ok(Committed::new(dpid, events))
    }

    /// Current pointer of `dpid`.
    pub fn resolve_alias(&self, dpid: Dpid) -> Result<&ContentPointer, RegistryError> {
        self.aliases.resolve(dpid)
    }

    /// Legacy history of `dpid`.
    pub fn lookup_legacy(&self, dpid: Dpid) -> Result<&LegacyDpidEntry, RegistryError> {
        self.aliases.lookup_legacy(dpid)
    }

    /// Upgrade a legacy dPID to live.
    pub fn upgrade_alias(
        &mut self,
        caller: Principal,
        dpid: Dpid,
        content_pointer: ContentPointer,
    ) -> Result<Committed<()>, RegistryError> {
        self.admin()?;
        let mut events = Vec::new();
        self.aliases
            .upgrade(caller, dpid, content_pointer, &mut events)?;
        Ok(Committed::new((), events))
    }

    /// Lifecycle state of `dpid`.
    #[must_use]
    pub fn dpid_state(&self, dpid: Dpid) -> DpidState {
        self.aliases.state(dpid)
    }

    /// dPID the next mint will return.
    #[must_use]
    pub fn next_dpid(&self) -> Dpid {
        self.aliases.next_dpid()
    }

    // -------------------------------------------------------------------------
    // Migration
    // -------------------------------------------------------------------------

    /// Replay a migration batch atomically.
    pub fn import_legacy_batch(
        &mut self,
        caller: Principal,
        records: &[LegacyRecord],
        default_prefix: &str,
    ) -> Result<Committed<usize>, RegistryError> {
        let admin = self.admin()?;
        let mut events = Vec::new();
        let applied = self.importer.import_batch(
            caller,
            admin,
            records,
            default_prefix,
            &mut self.aliases,
            &mut self.directory,
            &mut events,
        )?;
        Ok(Committed::new(applied, events))
    }

    /// Imported content object.
    pub fn content_object(&self, id: &ContentObjectId) -> Result<&ContentObject, RegistryError> {
        self.importer
            .content_object(id)
            .ok_or_else(|| RegistryError::UnknownContentObject(id.to_string()))
    }
}
