//! # Domain Invariants
//!
//! Business rules that must always hold for the registry.

use super::errors::RegistryError;
use super::value_objects::Fee;

/// Prefixes that can never be registered by ordinary callers.
///
/// All of them are assigned to the administrator at initialization.
pub const RESERVED_PREFIXES: [&str; 3] = ["", "desci", "dpid"];

/// Longest accepted prefix, in bytes.
pub const MAX_PREFIX_LEN: usize = 64;

/// True when `prefix` belongs to the fixed reserved set.
#[must_use]
pub fn is_reserved_prefix(prefix: &str) -> bool {
    RESERVED_PREFIXES.contains(&prefix)
}

/// Invariant: prefix charset is ASCII alphanumerics, `-` and `.` only.
///
/// Whitespace and control characters are rejected by the same rule since
/// they fall outside the allowed set.
pub fn validate_prefix(prefix: &str) -> Result<(), RegistryError> {
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(RegistryError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: format!("length must be <= {MAX_PREFIX_LEN}"),
        });
    }

    if let Some(bad) = prefix
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(RegistryError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: format!("contains invalid character {bad:?}"),
        });
    }

    Ok(())
}

/// Invariant: attached fee meets the requirement.
pub fn check_fee(required: Fee, provided: Fee) -> Result<(), RegistryError> {
    if provided < required {
        return Err(RegistryError::InsufficientFee { required, provided });
    }
    Ok(())
}
