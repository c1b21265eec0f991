//! Cross-component scenarios and the fixtures they share.

pub mod aliases;
pub mod events;
pub mod namespaces;

use std::sync::Arc;

use dpid_registry::{
    ContentObjectId, ContentPointer, Dpid, GateToken, InMemoryTokenLedger, InMemoryTreasury,
    LegacyRecord, Principal, RegistryConfig, RegistryService,
};

/// Registry administrator used by every scenario.
pub const ADMIN: Principal = Principal([0xAD; 20]);
/// Ordinary user.
pub const ALICE: Principal = Principal([0xA1; 20]);
/// Second ordinary user.
pub const BOB: Principal = Principal([0xB0; 20]);
/// Gate token.
pub const T1: GateToken = GateToken([0x71; 20]);
/// Second gate token.
pub const T2: GateToken = GateToken([0x72; 20]);

/// Namespace fee used by [`Harness::new`].
pub const NAMESPACE_FEE: u64 = 10;
/// Entry fee used by [`Harness::new`].
pub const ENTRY_FEE: u64 = 2;
/// First minted dPID used by [`Harness::new`].
pub const FIRST_DPID: u64 = 100;

/// An initialized service plus handles on its in-memory collaborators.
pub struct Harness {
    /// Service under test.
    pub service: RegistryService,
    /// Token balances backing the access gate.
    pub ledger: Arc<InMemoryTokenLedger>,
    /// Fee payout accounts.
    pub treasury: Arc<InMemoryTreasury>,
}

impl Harness {
    /// Service initialized by [`ADMIN`] with the default fees.
    pub async fn new() -> Self {
        Self::with_config(RegistryConfig {
            first_dpid: FIRST_DPID,
            namespace_fee: NAMESPACE_FEE,
            entry_fee: ENTRY_FEE,
            ..RegistryConfig::default()
        })
        .await
    }

    /// Service initialized by [`ADMIN`] with `config`.
    pub async fn with_config(config: RegistryConfig) -> Self {
        let ledger = Arc::new(InMemoryTokenLedger::new());
        let treasury = Arc::new(InMemoryTreasury::new());
        let service =
            RegistryService::bootstrap(config, ADMIN, ledger.clone(), treasury.clone())
                .await
                .expect("bootstrap");
        Self {
            service,
            ledger,
            treasury,
        }
    }
}

/// One legacy record whose pointer encodes object and timestamp.
pub fn record(from: Principal, object: &str, dpid: u64, timestamp: u64) -> LegacyRecord {
    LegacyRecord {
        from,
        content_object_id: ContentObjectId::new(object),
        dpid: Dpid(dpid),
        timestamp,
        content_pointer: pointer(object, timestamp),
    }
}

/// Pointer naming `object` at `timestamp`.
pub fn pointer(object: &str, timestamp: u64) -> ContentPointer {
    ContentPointer::new(format!("{object}@{timestamp}"))
}
