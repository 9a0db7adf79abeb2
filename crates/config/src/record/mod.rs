//! Static field-descriptor tables for settings records.
//!
//! Responsibilities:
//! - Describe the shape of a settings record (`RecordType`, `FieldDescriptor`).
//! - Tie a Rust type to its table through the `ConfigRecord` trait.
//! - Enumerate leaf fields (see `fields`) and coerce raw values (see `value`).
//!
//! Does NOT handle:
//! - Deriving environment keys (see `naming`).
//! - Reading files or the process environment (see `loader`).
//!
//! Invariants:
//! - Tables are `'static` and never mutated.
//! - A descriptor's `key` is the serde name of the field; for embedded records
//!   the Rust field must be `#[serde(flatten)]`.

mod fields;
mod value;

use serde::de::DeserializeOwned;

pub use fields::{LeafField, enumerate, leaf_fields};
pub use value::ValueKind;

/// A settings type that can be resolved by the loader.
///
/// The table returned by [`ConfigRecord::record_type`] must mirror the serde
/// shape of the type: one descriptor per field, keyed by the serde name.
///
/// ```rust,ignore
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Server {
///     listen_port: u16,
/// }
///
/// impl ConfigRecord for Server {
///     fn record_type() -> &'static RecordType {
///         static RECORD: RecordType = RecordType::new(
///             "Server",
///             &[FieldDescriptor::leaf("ListenPort", "listenPort", ValueKind::Integer)],
///         );
///         &RECORD
///     }
/// }
/// ```
pub trait ConfigRecord: DeserializeOwned {
    /// The static description of this record's fields.
    fn record_type() -> &'static RecordType;
}

/// Description of one record type: its name and its fields in declaration order.
#[derive(Debug)]
pub struct RecordType {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl RecordType {
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }
}

/// One field of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// PascalCase identifier; the environment key is derived from it.
    pub identifier: &'static str,
    /// Key of the field in the configuration file and in serde.
    pub key: &'static str,
    pub kind: FieldKind,
}

/// Whether a field is a scalar or a nested record.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Leaf(ValueKind),
    Nested {
        record: fn() -> &'static RecordType,
        /// Embedded records share their parent's level in the file.
        embedded: bool,
    },
}

impl FieldDescriptor {
    /// A scalar field.
    pub const fn leaf(identifier: &'static str, key: &'static str, kind: ValueKind) -> Self {
        Self {
            identifier,
            key,
            kind: FieldKind::Leaf(kind),
        }
    }

    /// A nested record stored under its own key as an object/table.
    pub const fn nested(
        identifier: &'static str,
        key: &'static str,
        record: fn() -> &'static RecordType,
    ) -> Self {
        Self {
            identifier,
            key,
            kind: FieldKind::Nested {
                record,
                embedded: false,
            },
        }
    }

    /// A nested record whose fields are flattened into the parent.
    pub const fn embedded(
        identifier: &'static str,
        key: &'static str,
        record: fn() -> &'static RecordType,
    ) -> Self {
        Self {
            identifier,
            key,
            kind: FieldKind::Nested {
                record,
                embedded: true,
            },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldKind::Leaf(_))
    }
}
