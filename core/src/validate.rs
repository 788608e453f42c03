//! Registry validation.
//!
//! Catches registrations that could never be dispatched before a parser is
//! built. Duplicate spellings are not an error: the registry is a map and the
//! last registration wins.

use crate::error::RegistryError;
use crate::parser::OptionMap;

/// Validates the flag spellings of a registry.
///
/// Keys are visited in sorted order so the reported error is deterministic.
/// Every key must begin with `-`; the reserved leading-group key `"-"` is
/// itself valid.
pub fn validate_registry<C>(options: &OptionMap<C>) -> Vec<RegistryError> {
    let mut errors = Vec::new();
    let mut flags: Vec<&String> = options.keys().collect();
    flags.sort();

    for flag in flags {
        if !flag.starts_with('-') {
            errors.push(RegistryError::InvalidFlag(flag.clone()));
        }
    }

    errors
}
