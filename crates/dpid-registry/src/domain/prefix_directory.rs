//! # Prefix Directory
//!
//! Namespace registration, gate updates and fee custody.
//!
//! Every operation checks all of its preconditions before touching state,
//! so an `Err` return leaves the directory and the fee vault untouched.

use super::entities::Namespace;
use super::errors::RegistryError;
use super::invariants::{check_fee, is_reserved_prefix, RESERVED_PREFIXES};
use super::value_objects::{Fee, GateToken, Prefix, Principal};
use crate::events::RegistryEvent;
use crate::ports::outbound::FeeTreasury;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Fees collected by namespace registration and entry allocation.
#[derive(Debug, Default)]
pub struct FeeVault {
    balance: Fee,
}

impl FeeVault {
    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> Fee {
        self.balance
    }

    /// Balance after depositing `amount`, without applying it.
    pub(crate) fn balance_after_deposit(&self, amount: Fee) -> Result<Fee, RegistryError> {
        self.balance
            .checked_add(amount)
            .ok_or(RegistryError::CounterExhausted("fee vault"))
    }

    pub(crate) fn set_balance(&mut self, balance: Fee) {
        self.balance = balance;
    }
}

/// Owns namespace registrations.
#[derive(Debug)]
pub struct PrefixDirectory {
    namespaces: HashMap<Prefix, Namespace>,
    namespace_fee: Fee,
}

impl PrefixDirectory {
    /// Create an empty directory charging `namespace_fee` per registration.
    #[must_use]
    pub fn new(namespace_fee: Fee) -> Self {
        Self {
            namespaces: HashMap::new(),
            namespace_fee,
        }
    }

    /// Fee required to register a namespace.
    #[must_use]
    pub fn namespace_fee(&self) -> Fee {
        self.namespace_fee
    }

    /// Registered namespace for `prefix`, if any.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&Namespace> {
        self.namespaces.get(prefix)
    }

    /// Number of registered namespaces, reserved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Assign every reserved prefix to the administrator.
    pub(crate) fn reserve_defaults(&mut self, admin: Principal, events: &mut Vec<RegistryEvent>) {
        for raw in RESERVED_PREFIXES {
            let prefix = Prefix(raw.to_string());
            self.insert_open(prefix, admin, events);
        }
    }

    /// Reserve `prefix` for the administrator the first time it is seen.
    ///
    /// Returns `true` if the prefix was newly reserved.
    pub(crate) fn reserve_for(
        &mut self,
        admin: Principal,
        prefix: &Prefix,
        events: &mut Vec<RegistryEvent>,
    ) -> bool {
        if self.namespaces.contains_key(prefix) {
            return false;
        }
        self.insert_open(prefix.clone(), admin, events);
        true
    }

    fn insert_open(&mut self, prefix: Prefix, admin: Principal, events: &mut Vec<RegistryEvent>) {
        debug!(prefix = %prefix, "Reserving namespace for administrator");
        events.push(RegistryEvent::NamespaceRegistered {
            prefix: prefix.clone(),
            registrant: admin,
            gate_tokens: BTreeSet::new(),
        });
        self.namespaces.insert(
            prefix.clone(),
            Namespace {
                prefix,
                registrant: admin,
                gate_tokens: BTreeSet::new(),
            },
        );
    }

    /// Register a namespace for `caller`.
    pub fn register(
        &mut self,
        caller: Principal,
        prefix: &str,
        gate_tokens: Option<BTreeSet<GateToken>>,
        fee: Fee,
        vault: &mut FeeVault,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<Namespace, RegistryError> {
        let prefix = Prefix::parse(prefix)?;
        if is_reserved_prefix(prefix.as_str()) {
            return Err(RegistryError::PrefixReserved(prefix.into()));
        }
        if self.namespaces.contains_key(&prefix) {
            return Err(RegistryError::PrefixTaken(prefix.into()));
        }
        check_fee(self.namespace_fee, fee)?;
        let new_balance = vault.balance_after_deposit(fee)?;

        let namespace = Namespace {
            prefix: prefix.clone(),
            registrant: caller,
            gate_tokens: gate_tokens.unwrap_or_default(),
        };
        self.namespaces.insert(prefix, namespace.clone());
        vault.set_balance(new_balance);

        info!(
            prefix = %namespace.prefix,
            registrant = %caller,
            gated = namespace.is_gated(),
            "Namespace registered"
        );
        events.push(RegistryEvent::NamespaceRegistered {
            prefix: namespace.prefix.clone(),
            registrant: namespace.registrant,
            gate_tokens: namespace.gate_tokens.clone(),
        });
        Ok(namespace)
    }

    /// Replace the gate set of a namespace. Registrant only.
    pub fn update_gate(
        &mut self,
        caller: Principal,
        prefix: &str,
        gate_tokens: BTreeSet<GateToken>,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<(), RegistryError> {
        let namespace = self
            .namespaces
            .get_mut(prefix)
            .ok_or_else(|| RegistryError::UnknownNamespace(prefix.to_string()))?;
        if namespace.registrant != caller {
            return Err(RegistryError::NotRegistrant {
                prefix: prefix.to_string(),
                caller,
            });
        }

        namespace.gate_tokens = gate_tokens;

        info!(
            prefix = %namespace.prefix,
            tokens = namespace.gate_tokens.len(),
            "Namespace gate replaced"
        );
        events.push(RegistryEvent::NamespaceGateUpdated {
            prefix: namespace.prefix.clone(),
            gate_tokens: namespace.gate_tokens.clone(),
        });
        Ok(())
    }

    /// Pay the whole vault out to the administrator.
    pub fn withdraw_fees(
        caller: Principal,
        admin: Principal,
        vault: &mut FeeVault,
        treasury: &dyn FeeTreasury,
        events: &mut Vec<RegistryEvent>,
    ) -> Result<Fee, RegistryError> {
        if caller != admin {
            return Err(RegistryError::NotAdministrator(caller));
        }

        let amount = vault.balance();
        treasury.credit(&admin, amount)?;
        vault.set_balance(0);

        info!(recipient = %admin, amount, "Fees withdrawn");
        events.push(RegistryEvent::FeesWithdrawn {
            recipient: admin,
            amount,
        });
        Ok(amount)
    }
}
