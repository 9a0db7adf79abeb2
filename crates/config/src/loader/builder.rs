//! Settings loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` holding search paths, file name and policy.
//! - Run one load: enumerate leaves, bind env, read the file, merge, deserialize.
//!
//! Does NOT handle:
//! - Parsing individual formats (delegated to file.rs).
//! - Reading environment variables (delegated to env.rs).
//! - Precedence rules (delegated to merge.rs).
//!
//! Invariants / Assumptions:
//! - Each load builds its own context; nothing is cached between calls.
//! - The target is written once, after every step has succeeded.
//! - With no search paths configured, the current directory is searched.

use std::path::{Path, PathBuf};

use super::env::bind_env;
use super::error::ConfigError;
use super::file::{locate, read_config_file};
use super::merge::{OverridePolicy, resolve};
use crate::record::{ConfigRecord, leaf_fields};

/// Loads a [`ConfigRecord`] from a config file overlaid with environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
    file_name: Option<String>,
    policy: OverridePolicy,
}

impl ConfigLoader {
    /// Create a new loader with no search paths and the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory to search for the config file.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Replace the directories searched for the config file, in priority order.
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the config file name, usually without extension (`appsettings`).
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Choose when environment variables replace file values.
    pub fn with_policy(mut self, policy: OverridePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn policy(&self) -> OverridePolicy {
        self.policy
    }

    /// Resolve a fresh `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No file name was set or the file is not in any search path (`FileNotFound`)
    /// - The file cannot be read (`FileRead`) or parsed (`FileParse`)
    /// - The record's field table is malformed (`Binding`, `EnvKeyCollision`)
    /// - A value does not fit its field (`UnmarshalType`, `Assign`)
    pub fn load<T: ConfigRecord>(&self) -> Result<T, ConfigError> {
        let file_name = self
            .file_name
            .as_deref()
            .ok_or(ConfigError::MissingFileName)?;
        let search_paths = self.effective_search_paths();

        let record = T::record_type();
        let bindings = bind_env(leaf_fields(record)?)?;

        let (path, format) = locate(&search_paths, file_name)?;
        tracing::debug!(
            path = %path.display(),
            format = %format,
            record = record.name,
            "Loading settings from config file"
        );
        let file = read_config_file(&path, format)?;

        let merged = resolve(record, &file, &bindings, self.policy)?;
        serde_json::from_value(merged).map_err(ConfigError::Assign)
    }

    /// Resolve into an existing `target`.
    ///
    /// On error `target` is left as it was.
    pub fn load_into<T: ConfigRecord>(&self, target: &mut T) -> Result<(), ConfigError> {
        *target = self.load()?;
        Ok(())
    }

    fn effective_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.search_paths.clone()
        }
    }
}

/// Populate `target` from `file_name` found in `search_paths`, with bound
/// environment variables always overriding file values.
///
/// ```rust,ignore
/// let mut settings = Base::default();
/// layered_settings::load(&["."], "appsettings", &mut settings)?;
/// ```
pub fn load<T, P>(search_paths: &[P], file_name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: ConfigRecord,
    P: AsRef<Path>,
{
    ConfigLoader::new()
        .with_search_paths(search_paths.iter().map(|p| p.as_ref().to_path_buf()))
        .with_file_name(file_name)
        .load_into(target)
}
