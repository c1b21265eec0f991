//! # Registry Service
//!
//! Serializes commands into the domain state machine and publishes what
//! they commit.
//!
//! ## Ordering
//!
//! One writer at a time: the registry sits behind a single async mutex,
//! and committed events are appended to the log and broadcast while that
//! mutex is still held. Log offsets therefore follow commit order, and a
//! rejected command leaves no trace besides the rejection counters.

use crate::adapters::{EventFilter, InMemoryEventBus, Subscription};
use crate::config::RegistryConfig;
use crate::domain::{
    Command, CommandResult, Committed, ContentObject, ContentObjectId, ContentPointer, Dpid,
    DpidState, ErrorKind, Fee, GateToken, InitParams, LegacyDpidEntry, LegacyRecord, Namespace,
    Principal, Registry, RegistryError, SequenceId,
};
use crate::events::{EventLog, RecordedEvent};
use crate::ports::inbound::DpidRegistryApi;
use crate::ports::outbound::{FeeTreasury, TokenOwnershipOracle};

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Statistics for the registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Commands that committed.
    pub commands_applied: u64,
    /// Commands rejected for any reason.
    pub commands_rejected: u64,
    /// Rejections with kind `validation`.
    pub validation_errors: u64,
    /// Rejections with kind `payment`.
    pub payment_errors: u64,
    /// Rejections with kind `authorization`.
    pub authorization_errors: u64,
    /// Rejections with kind `state`.
    pub state_errors: u64,
    /// Events appended to the log.
    pub events_emitted: u64,
}

impl ServiceStats {
    fn record_rejection(&mut self, kind: ErrorKind) {
        self.commands_rejected += 1;
        match kind {
            ErrorKind::Validation => self.validation_errors += 1,
            ErrorKind::Payment => self.payment_errors += 1,
            ErrorKind::Authorization => self.authorization_errors += 1,
            ErrorKind::State => self.state_errors += 1,
        }
    }
}

/// The dPID registry service.
pub struct RegistryService {
    registry: Mutex<Registry>,
    log: RwLock<EventLog>,
    bus: InMemoryEventBus,
    stats: RwLock<ServiceStats>,
    config: RegistryConfig,
}

impl RegistryService {
    /// Create an uninitialized service.
    pub fn new(
        config: RegistryConfig,
        oracle: Arc<dyn TokenOwnershipOracle>,
        treasury: Arc<dyn FeeTreasury>,
    ) -> Self {
        Self {
            registry: Mutex::new(Registry::new(oracle, treasury)),
            log: RwLock::new(EventLog::new()),
            bus: InMemoryEventBus::with_capacity(config.event_channel_capacity),
            stats: RwLock::new(ServiceStats::default()),
            config,
        }
    }

    /// Create a service and initialize it with `administrator` using the
    /// configured parameters.
    pub async fn bootstrap(
        config: RegistryConfig,
        administrator: Principal,
        oracle: Arc<dyn TokenOwnershipOracle>,
        treasury: Arc<dyn FeeTreasury>,
    ) -> Result<Self, RegistryError> {
        let params = config.init_params();
        let service = Self::new(config, oracle, treasury);
        service
            .submit(administrator, Command::Initialize(params))
            .await?;
        Ok(service)
    }

    /// Configuration the service was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Apply one command as `caller`.
    #[instrument(skip_all, fields(caller = %caller, op = command.name()))]
    pub async fn submit(
        &self,
        caller: Principal,
        command: Command,
    ) -> Result<CommandResult, RegistryError> {
        self.commit(|registry| registry.apply(caller, command)).await
    }

    async fn commit<T>(
        &self,
        op: impl FnOnce(&mut Registry) -> Result<Committed<T>, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut registry = self.registry.lock().await;

        match op(&mut *registry) {
            Ok(Committed { value, events }) => {
                let emitted = events.len() as u64;
                let recorded = self.log.write().append(events);
                self.bus.publish_all(&recorded);

                let mut stats = self.stats.write();
                stats.commands_applied += 1;
                stats.events_emitted += emitted;
                debug!(events = emitted, "Command committed");
                Ok(value)
            }
            Err(err) => {
                self.stats.write().record_rejection(err.kind());
                warn!(kind = err.kind().as_str(), error = %err, "Command rejected");
                Err(err)
            }
        }
    }

    /// Run a read against the current state.
    async fn read<T>(&self, op: impl FnOnce(&Registry) -> T) -> T {
        let registry = self.registry.lock().await;
        op(&*registry)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribe to future committed events.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Logged events with offset `>= offset`.
    #[must_use]
    pub fn events_since(&self, offset: u64) -> Vec<RecordedEvent> {
        self.log.read().since(offset).to_vec()
    }

    /// Number of events in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.log.read().len()
    }

    /// Current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// True once initialization has committed.
    pub async fn is_initialized(&self) -> bool {
        self.read(Registry::is_initialized).await
    }

    /// Registry administrator, once initialized.
    pub async fn administrator(&self) -> Option<Principal> {
        self.read(Registry::administrator).await
    }

    /// Number of entries allocated under `prefix`.
    pub async fn entry_count(&self, prefix: &str) -> u64 {
        self.read(|r| r.entry_count(prefix)).await
    }

    /// dPID the next mint will return.
    pub async fn next_dpid(&self) -> Dpid {
        self.read(Registry::next_dpid).await
    }
}

#[async_trait]
impl DpidRegistryApi for RegistryService {
    #[instrument(skip_all, fields(caller = %caller))]
    async fn initialize(&self, caller: Principal, params: InitParams) -> Result<(), RegistryError> {
        self.commit(|r| r.initialize(caller, params)).await?;
        info!(first_dpid = params.first_dpid, "Registry service initialized");
        Ok(())
    }

    #[instrument(skip_all, fields(caller = %caller, prefix = %prefix, fee = fee))]
    async fn register_namespace(
        &self,
        caller: Principal,
        prefix: &str,
        gate_tokens: Option<BTreeSet<GateToken>>,
        fee: Fee,
    ) -> Result<Namespace, RegistryError> {
        self.commit(|r| r.register_namespace(caller, prefix, gate_tokens, fee))
            .await
    }

    #[instrument(skip_all, fields(caller = %caller, prefix = %prefix))]
    async fn update_namespace_gate(
        &self,
        caller: Principal,
        prefix: &str,
        gate_tokens: BTreeSet<GateToken>,
    ) -> Result<(), RegistryError> {
        self.commit(|r| r.update_namespace_gate(caller, prefix, gate_tokens))
            .await
    }

    #[instrument(skip_all, fields(caller = %caller, prefix = %prefix, fee = fee))]
    async fn put_entry(
        &self,
        caller: Principal,
        prefix: &str,
        content_pointer: ContentPointer,
        fee: Fee,
    ) -> Result<SequenceId, RegistryError> {
        self.commit(|r| r.put_entry(caller, prefix, content_pointer, fee))
            .await
    }

    async fn get_entry(
        &self,
        prefix: &str,
        sequence_id: SequenceId,
    ) -> Result<ContentPointer, RegistryError> {
        self.read(|r| r.get_entry(prefix, sequence_id).cloned())
            .await
    }

    #[instrument(skip_all, fields(caller = %caller))]
    async fn withdraw_fees(&self, caller: Principal) -> Result<Fee, RegistryError> {
        self.commit(|r| r.withdraw_fees(caller)).await
    }

    #[instrument(skip_all, fields(caller = %caller))]
    async fn mint_alias(
        &self,
        caller: Principal,
        content_pointer: ContentPointer,
    ) -> Result<Dpid, RegistryError> {
        let dpid = self.commit(|r| r.mint_alias(content_pointer)).await?;
        debug!(caller = %caller, dpid = dpid.value(), "Alias minted for caller");
        Ok(dpid)
    }

    async fn resolve_alias(&self, dpid: Dpid) -> Result<ContentPointer, RegistryError> {
        self.read(|r| r.resolve_alias(dpid).cloned()).await
    }

    async fn lookup_legacy(&self, dpid: Dpid) -> Result<LegacyDpidEntry, RegistryError> {
        self.read(|r| r.lookup_legacy(dpid).cloned()).await
    }

    #[instrument(skip_all, fields(caller = %caller, dpid = dpid.value()))]
    async fn upgrade_alias(
        &self,
        caller: Principal,
        dpid: Dpid,
        content_pointer: ContentPointer,
    ) -> Result<(), RegistryError> {
        self.commit(|r| r.upgrade_alias(caller, dpid, content_pointer))
            .await
    }

    #[instrument(skip_all, fields(caller = %caller, records = records.len(), default_prefix = %default_prefix))]
    async fn import_legacy_batch(
        &self,
        caller: Principal,
        records: Vec<LegacyRecord>,
        default_prefix: &str,
    ) -> Result<usize, RegistryError> {
        self.commit(|r| r.import_legacy_batch(caller, &records, default_prefix))
            .await
    }

    async fn namespace(&self, prefix: &str) -> Result<Namespace, RegistryError> {
        self.read(|r| r.namespace(prefix).cloned()).await
    }

    async fn content_object(&self, id: &ContentObjectId) -> Result<ContentObject, RegistryError> {
        self.read(|r| r.content_object(id).cloned()).await
    }

    async fn dpid_state(&self, dpid: Dpid) -> DpidState {
        self.read(|r| r.dpid_state(dpid)).await
    }

    async fn collected_fees(&self) -> Fee {
        self.read(Registry::collected_fees).await
    }
}
