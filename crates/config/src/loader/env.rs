//! Environment bindings for leaf fields.
//!
//! Responsibilities:
//! - Bind every leaf's dotted path to its derived environment key.
//! - Snapshot the bound variables once per load.
//! - Reject tables where two distinct identifiers derive the same key.
//!
//! Does NOT handle:
//! - Deciding whether the environment wins over the file (see `merge.rs`).
//! - Type coercion of the raw strings (see `record::value`).
//!
//! Invariants:
//! - A variable is absent only when it is unset; an empty string is a value.
//! - Values are not decoded here; a value the merge never uses is never validated.
//! - The same identifier reused in two nested records shares one variable.

use std::collections::HashMap;
use std::ffi::OsString;

use super::error::ConfigError;
use crate::record::LeafField;

/// A leaf together with the current value of its environment variable.
///
/// The raw value is kept as read; it is only checked for valid unicode when
/// the merge actually uses it.
#[derive(Debug, Clone)]
pub(crate) struct EnvBinding {
    pub leaf: LeafField,
    pub value: Option<OsString>,
}

/// Read an environment variable, keeping empty values.
///
/// Returns `Ok(None)` only when the variable is unset.
pub fn env_var_if_set(key: &str) -> Result<Option<String>, OsString> {
    match std::env::var_os(key) {
        Some(raw) => raw.into_string().map(Some),
        None => Ok(None),
    }
}

/// Bind each leaf to its environment variable and read the current values.
pub(crate) fn bind_env(leaves: Vec<LeafField>) -> Result<Vec<EnvBinding>, ConfigError> {
    let mut owners: HashMap<String, (&'static str, &'static str)> = HashMap::new();
    for leaf in &leaves {
        match owners.get(&leaf.env_key) {
            Some((record, identifier)) if *identifier != leaf.identifier => {
                return Err(ConfigError::EnvKeyCollision {
                    env_key: leaf.env_key.clone(),
                    first: format!("{record}.{identifier}"),
                    second: format!("{}.{}", leaf.record, leaf.identifier),
                });
            }
            Some(_) => {
                tracing::debug!(
                    env_key = %leaf.env_key,
                    path = %leaf.dotted_path(),
                    "Environment variable shared by more than one field"
                );
            }
            None => {
                owners.insert(leaf.env_key.clone(), (leaf.record, leaf.identifier));
            }
        }
    }

    let bindings = leaves
        .into_iter()
        .map(|leaf| {
            let value = std::env::var_os(&leaf.env_key);
            tracing::trace!(
                path = %leaf.dotted_path(),
                env_key = %leaf.env_key,
                set = value.is_some(),
                "Bound field to environment variable"
            );
            EnvBinding { leaf, value }
        })
        .collect();
    Ok(bindings)
}
