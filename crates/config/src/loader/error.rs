//! Error types for settings resolution.
//!
//! Responsibilities:
//! - Define error variants for every way a load can fail.
//! - Group variants into the four categories callers act on (`ErrorKind`).
//!
//! Does NOT handle:
//! - Recovery or retries; errors are returned to the immediate caller.
//!
//! Invariants:
//! - Variants carry the paths, keys and field paths needed to act on them.
//! - Environment values and file contents are never included in messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::file::FileFormat;
use crate::record::ValueKind;

/// Errors that can occur while resolving a settings record.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file name was given")]
    MissingFileName,

    #[error("Config file '{file_name}' not found in any of {searched:?}")]
    FileNotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config file at {path}: {message}")]
    FileParse {
        path: PathBuf,
        format: FileFormat,
        message: String,
    },

    #[error("Invalid field {record}.{field}: {reason}")]
    Binding {
        record: String,
        field: String,
        reason: String,
    },

    #[error("Environment key {env_key} is derived from both {first} and {second}")]
    EnvKeyCollision {
        env_key: String,
        first: String,
        second: String,
    },

    #[error("Cannot use value from {origin} for '{path}' as {expected}: {message}")]
    UnmarshalType {
        path: String,
        expected: ValueKind,
        origin: ValueOrigin,
        message: String,
    },

    #[error("Failed to assign resolved settings: {0}")]
    Assign(#[source] serde_json::Error),
}

/// Where a rejected value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOrigin {
    Env(String),
    File,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOrigin::Env(key) => write!(f, "environment variable {key}"),
            ValueOrigin::File => f.write_str("config file"),
        }
    }
}

/// Broad category of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be found or opened.
    FileAccess,
    /// The file does not conform to its format.
    Parse,
    /// The record's field table cannot be bound to the environment.
    Binding,
    /// A resolved value does not fit its field.
    UnmarshalType,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::MissingFileName
            | ConfigError::FileNotFound { .. }
            | ConfigError::FileRead { .. } => ErrorKind::FileAccess,
            ConfigError::FileParse { .. } => ErrorKind::Parse,
            ConfigError::Binding { .. } | ConfigError::EnvKeyCollision { .. } => {
                ErrorKind::Binding
            }
            ConfigError::UnmarshalType { .. } | ConfigError::Assign(_) => {
                ErrorKind::UnmarshalType
            }
        }
    }
}
