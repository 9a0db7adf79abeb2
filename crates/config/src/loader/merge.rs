//! Leaf-by-leaf merge of environment and file values.
//!
//! Responsibilities:
//! - Apply the override policy to each bound leaf.
//! - Build the merged tree in the serde shape of the target record.
//!
//! Does NOT handle:
//! - Locating or parsing the file (see `file.rs`).
//! - Reading the environment (see `env.rs`).
//!
//! Invariants:
//! - Every leaf of the record is present in the merged tree; leaves no source
//!   provides hold the zero value of their kind.
//! - File keys match field keys case-insensitively, an exact match wins.
//!   Tables whose names differ only by case are searched in turn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::env::EnvBinding;
use super::error::{ConfigError, ValueOrigin};
use crate::record::{FieldKind, LeafField, RecordType};

/// When an environment variable replaces the file value of a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverridePolicy {
    /// A set variable always wins, even when it is empty and the file has a value.
    #[default]
    OverrideAlways,
    /// The variable is used only when the file value is missing or zero, and
    /// only if the variable is non-empty.
    OverrideIfEmpty,
}

/// Resolve every binding against `file` and return the merged tree.
pub(crate) fn resolve(
    record: &RecordType,
    file: &Map<String, Value>,
    bindings: &[EnvBinding],
    policy: OverridePolicy,
) -> Result<Value, ConfigError> {
    let mut merged = skeleton(record);

    for binding in bindings {
        let leaf = &binding.leaf;
        let from_file = match lookup_path(file, leaf)? {
            Some(raw) => leaf
                .kind
                .coerce_value(raw)
                .map_err(|message| unmarshal_error(leaf, ValueOrigin::File, message))?,
            None => None,
        };

        let use_env = match (policy, binding.value.as_deref()) {
            (_, None) => false,
            (OverridePolicy::OverrideAlways, Some(_)) => true,
            (OverridePolicy::OverrideIfEmpty, Some(raw)) => {
                !raw.is_empty() && from_file.as_ref().is_none_or(|v| leaf.kind.is_zero(v))
            }
        };

        let resolved = match binding.value.as_deref() {
            Some(raw) if use_env => {
                tracing::debug!(
                    env_key = %leaf.env_key,
                    path = %leaf.dotted_path(),
                    "Environment variable overrides config file value"
                );
                let origin = || ValueOrigin::Env(leaf.env_key.clone());
                let raw = raw.to_str().ok_or_else(|| {
                    unmarshal_error(leaf, origin(), "value is not valid unicode".to_string())
                })?;
                Some(
                    leaf.kind
                        .coerce_str(raw)
                        .map_err(|message| unmarshal_error(leaf, origin(), message))?,
                )
            }
            _ => from_file,
        };

        if let Some(value) = resolved {
            set_path(&mut merged, &leaf.path, value);
        }
    }

    Ok(Value::Object(merged))
}

/// Zero-valued tree with one entry per leaf and one table per non-embedded
/// nested record.
fn skeleton(record: &RecordType) -> Map<String, Value> {
    let mut map = Map::new();
    fill_skeleton(record, &mut map);
    map
}

fn fill_skeleton(record: &RecordType, map: &mut Map<String, Value>) {
    for field in record.fields {
        match field.kind {
            FieldKind::Leaf(kind) => {
                map.insert(field.key.to_string(), kind.zero());
            }
            FieldKind::Nested {
                record: nested,
                embedded: true,
            } => fill_skeleton(nested(), map),
            FieldKind::Nested {
                record: nested,
                embedded: false,
            } => {
                map.insert(field.key.to_string(), Value::Object(skeleton(nested())));
            }
        }
    }
}

fn lookup_key<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })
}

/// Tables named `key`, the exact match first, then those that differ only by
/// ASCII case.
fn candidates<'a>(
    map: &'a Map<String, Value>,
    key: &'a str,
) -> impl Iterator<Item = &'a Value> {
    let folded = map
        .iter()
        .filter(move |(name, _)| name.as_str() != key && name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value);
    map.get(key).into_iter().chain(folded)
}

fn lookup_path<'a>(
    file: &'a Map<String, Value>,
    leaf: &LeafField,
) -> Result<Option<&'a Value>, ConfigError> {
    lookup_in(file, &leaf.path, 0, leaf)
}

fn lookup_in<'a>(
    map: &'a Map<String, Value>,
    segments: &[&'static str],
    depth: usize,
    leaf: &LeafField,
) -> Result<Option<&'a Value>, ConfigError> {
    let Some((first, rest)) = segments.split_first() else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(lookup_key(map, first));
    }

    for table in candidates(map, first) {
        match table {
            Value::Object(inner) => {
                if let Some(found) = lookup_in(inner, rest, depth + 1, leaf)? {
                    return Ok(Some(found));
                }
            }
            Value::Null => {}
            _ => {
                return Err(ConfigError::UnmarshalType {
                    path: leaf.path[..=depth].join("."),
                    expected: leaf.kind,
                    origin: ValueOrigin::File,
                    message: "expected a table of settings".to_string(),
                });
            }
        }
    }
    Ok(None)
}

fn set_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}

fn unmarshal_error(leaf: &LeafField, origin: ValueOrigin, message: String) -> ConfigError {
    ConfigError::UnmarshalType {
        path: leaf.dotted_path(),
        expected: leaf.kind,
        origin,
        message,
    }
}
