//! Settings loader for config files and environment variables.
//!
//! Responsibilities:
//! - Locate and parse the config file (JSON, YAML, TOML, HCL, env-file, properties).
//! - Bind every leaf field of a record to its environment variable.
//! - Merge environment over file values and deserialize into the record.
//!
//! Does NOT handle:
//! - Describing record shapes (see `record`).
//! - Deriving environment keys (see `naming`).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over file values under the default policy.
//! - A missing or unparsable file fails the load before anything is assigned.

mod builder;
mod env;
mod error;
mod file;
mod merge;

pub use builder::{ConfigLoader, load};
pub use env::env_var_if_set;
pub use error::{ConfigError, ErrorKind, ValueOrigin};
pub use file::{FileFormat, SUPPORTED_EXTENSIONS};
pub use merge::OverridePolicy;

#[cfg(test)]
mod tests;
