//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports plus the event bus the
//! service publishes committed events on.

mod event_bus;
mod token_ledger;
mod treasury;

pub use event_bus::{EventFilter, InMemoryEventBus, Subscription, DEFAULT_CHANNEL_CAPACITY};
pub use token_ledger::InMemoryTokenLedger;
pub use treasury::InMemoryTreasury;
