//! Leaf-field enumeration.
//!
//! Invariants:
//! - Output order is declaration order, depth-first, with nested leaves
//!   spliced in where the nested field is declared.
//! - Nested-record fields never appear themselves, only their leaves.
//! - No deduplication: the same identifier in two nested records is emitted twice.

use std::collections::HashMap;

use super::{FieldKind, RecordType, ValueKind};
use crate::constants::MAX_NESTING_DEPTH;
use crate::loader::ConfigError;
use crate::naming::to_env_key;

/// One scalar field discovered while walking a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafField {
    /// PascalCase identifier of the field.
    pub identifier: &'static str,
    /// File keys from the root record down to this leaf. Embedded records
    /// contribute no segment.
    pub path: Vec<&'static str>,
    /// Environment variable bound to this leaf.
    pub env_key: String,
    pub kind: ValueKind,
    /// Name of the record that declares the field.
    pub record: &'static str,
}

impl LeafField {
    /// The path joined with `.`, e.g. `server.listenPort`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// List the identifiers of every leaf field of `record`.
///
/// Recursion stops at [`MAX_NESTING_DEPTH`], so a cyclic table cannot hang the
/// walk; [`leaf_fields`] reports that case as an error instead.
pub fn enumerate(record: &RecordType) -> Vec<&'static str> {
    fn walk(record: &RecordType, depth: usize, out: &mut Vec<&'static str>) {
        for field in record.fields {
            match field.kind {
                FieldKind::Leaf(_) => out.push(field.identifier),
                FieldKind::Nested { record: nested, .. } => {
                    if depth < MAX_NESTING_DEPTH {
                        walk(nested(), depth + 1, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(record, 0, &mut out);
    out
}

/// Walk `record` and describe every leaf, including its file path and
/// environment key.
///
/// # Errors
///
/// Returns `ConfigError::Binding` when a descriptor has an empty identifier or
/// key, when nesting is deeper than [`MAX_NESTING_DEPTH`], or when two leaves
/// end up at the same file path (e.g. two embedded records declaring the
/// same key).
pub fn leaf_fields(record: &'static RecordType) -> Result<Vec<LeafField>, ConfigError> {
    let mut out = Vec::new();
    walk_leaves(record, &mut Vec::new(), 0, &mut out)?;

    let mut seen: HashMap<String, &LeafField> = HashMap::with_capacity(out.len());
    for leaf in &out {
        if let Some(previous) = seen.insert(leaf.dotted_path(), leaf) {
            return Err(ConfigError::Binding {
                record: leaf.record.to_string(),
                field: leaf.identifier.to_string(),
                reason: format!(
                    "path '{}' is already used by {}.{}",
                    leaf.dotted_path(),
                    previous.record,
                    previous.identifier
                ),
            });
        }
    }

    Ok(out)
}

fn walk_leaves(
    record: &'static RecordType,
    prefix: &mut Vec<&'static str>,
    depth: usize,
    out: &mut Vec<LeafField>,
) -> Result<(), ConfigError> {
    for field in record.fields {
        if field.identifier.is_empty() || field.key.is_empty() {
            return Err(ConfigError::Binding {
                record: record.name.to_string(),
                field: field.identifier.to_string(),
                reason: "field identifier and key must not be empty".to_string(),
            });
        }

        match field.kind {
            FieldKind::Leaf(kind) => {
                let mut path = prefix.clone();
                path.push(field.key);
                out.push(LeafField {
                    identifier: field.identifier,
                    path,
                    env_key: to_env_key(field.identifier),
                    kind,
                    record: record.name,
                });
            }
            FieldKind::Nested {
                record: nested,
                embedded,
            } => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(ConfigError::Binding {
                        record: record.name.to_string(),
                        field: field.identifier.to_string(),
                        reason: format!(
                            "records nest deeper than {MAX_NESTING_DEPTH} levels (cyclic table?)"
                        ),
                    });
                }
                if !embedded {
                    prefix.push(field.key);
                }
                let result = walk_leaves(nested(), prefix, depth + 1, out);
                if !embedded {
                    prefix.pop();
                }
                result?;
            }
        }
    }
    Ok(())
}
