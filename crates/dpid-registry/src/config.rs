//! Registry configuration from environment variables.

use crate::adapters::DEFAULT_CHANNEL_CAPACITY;
use crate::domain::{Fee, InitParams};
use std::env;

/// Deployment parameters for a registry service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// First dPID the alias counter will mint.
    pub first_dpid: u64,

    /// Fee required to register a namespace.
    pub namespace_fee: Fee,

    /// Fee required to put an entry.
    pub entry_fee: Fee,

    /// Per-subscriber event buffer.
    pub event_channel_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            first_dpid: 0,
            namespace_fee: 0,
            entry_fee: 0,
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DPID_FIRST_DPID`: First minted dPID (default: 0)
    /// - `DPID_NAMESPACE_FEE`: Namespace registration fee (default: 0)
    /// - `DPID_ENTRY_FEE`: Entry fee (default: 0)
    /// - `DPID_EVENT_CAPACITY`: Event channel capacity (default: 1024)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            first_dpid: parse_var("DPID_FIRST_DPID").unwrap_or(defaults.first_dpid),
            namespace_fee: parse_var("DPID_NAMESPACE_FEE").unwrap_or(defaults.namespace_fee),
            entry_fee: parse_var("DPID_ENTRY_FEE").unwrap_or(defaults.entry_fee),
            event_channel_capacity: parse_var::<usize>("DPID_EVENT_CAPACITY")
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.event_channel_capacity),
        }
    }

    /// Initialization parameters derived from this configuration.
    #[must_use]
    pub fn init_params(&self) -> InitParams {
        InitParams {
            first_dpid: self.first_dpid,
            namespace_fee: self.namespace_fee,
            entry_fee: self.entry_fee,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
