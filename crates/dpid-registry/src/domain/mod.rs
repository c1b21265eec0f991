//! # Domain Module
//!
//! Registry state and the deterministic rules that change it.
//!
//! Components share one `apply` entry point on [`Registry`]; each one owns
//! a disjoint slice of state:
//!
//! - [`PrefixDirectory`] namespaces and the fee vault
//! - [`IdentifierAllocator`] per-namespace entries
//! - [`AliasRegistry`] flat dPIDs and the legacy bridge table
//! - [`LegacyMigrationImporter`] content objects

pub mod access_gate;
pub mod alias_registry;
pub mod entities;
pub mod errors;
pub mod identifier_allocator;
pub mod invariants;
pub mod migration;
pub mod prefix_directory;
pub mod registry;
pub mod value_objects;

pub use access_gate::AccessGate;
pub use alias_registry::AliasRegistry;
pub use entities::*;
pub use errors::*;
pub use identifier_allocator::IdentifierAllocator;
pub use invariants::*;
pub use migration::LegacyMigrationImporter;
pub use prefix_directory::{FeeVault, PrefixDirectory};
pub use registry::{Command, CommandResult, Committed, Registry};
pub use value_objects::*;
