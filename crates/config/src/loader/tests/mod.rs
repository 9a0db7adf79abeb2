//! Tests for the settings loader.
//!
//! Responsibilities:
//! - Test file discovery and population of records through `ConfigLoader`.
//! - Test environment precedence under both override policies.
//! - Test every supported file format against the same nested record.
//! - Test that overrides are logged without their values.
//!
//! Invariants:
//! - Tests that touch the process environment use `serial_test` and `env_lock()`.
//! - Every bound variable is cleared through `temp-env` unless a test sets it.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::Path;
use std::sync::Mutex;

use serde::Deserialize;

use crate::record::{ConfigRecord, FieldDescriptor, RecordType, ValueKind};
use crate::settings::Common;

pub mod policy_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Storage settings plus a local file path, flattened into one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    #[serde(flatten)]
    pub common: Common,
    pub local_file: String,
}

impl ConfigRecord for Override {
    fn record_type() -> &'static RecordType {
        static RECORD: RecordType = RecordType::new(
            "Override",
            &[
                FieldDescriptor::embedded("Common", "common", Common::record_type),
                FieldDescriptor::leaf("LocalFile", "localFile", ValueKind::String),
            ],
        );
        &RECORD
    }
}

/// Environment variables bound by [`Override`].
pub const OVERRIDE_ENV_KEYS: &[&str] = &[
    "AZURE_STORAGE_ACCOUNT",
    "AZURE_STORAGE_ACCESS_KEY",
    "GCP_PROJECT",
    "AWS_ENABLED",
    "LOCAL_FILE",
];

/// Listener settings stored under their own table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub host: String,
    pub listen_port: u16,
    pub tls: bool,
}

impl ConfigRecord for Listener {
    fn record_type() -> &'static RecordType {
        static RECORD: RecordType = RecordType::new(
            "Listener",
            &[
                FieldDescriptor::leaf("Host", "host", ValueKind::String),
                FieldDescriptor::leaf("ListenPort", "listenPort", ValueKind::Integer),
                FieldDescriptor::leaf("Tls", "tls", ValueKind::Bool),
            ],
        );
        &RECORD
    }
}

/// A record with both an embedded and a nested sub-record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_name: String,
    #[serde(flatten)]
    pub common: Common,
    pub listener: Listener,
    pub sample_rate: f64,
}

impl ConfigRecord for Service {
    fn record_type() -> &'static RecordType {
        static RECORD: RecordType = RecordType::new(
            "Service",
            &[
                FieldDescriptor::leaf("ServiceName", "serviceName", ValueKind::String),
                FieldDescriptor::embedded("Common", "common", Common::record_type),
                FieldDescriptor::nested("Listener", "listener", Listener::record_type),
                FieldDescriptor::leaf("SampleRate", "sampleRate", ValueKind::Float),
            ],
        );
        &RECORD
    }
}

/// Environment variables bound by [`Service`].
pub const SERVICE_ENV_KEYS: &[&str] = &[
    "SERVICE_NAME",
    "AZURE_STORAGE_ACCOUNT",
    "AZURE_STORAGE_ACCESS_KEY",
    "GCP_PROJECT",
    "AWS_ENABLED",
    "HOST",
    "LISTEN_PORT",
    "TLS",
    "SAMPLE_RATE",
];

/// Run `f` with every key in `bound` unset except those given in `set`.
pub fn with_env<R>(bound: &[&str], set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let mut vars: Vec<(String, Option<String>)> = bound
        .iter()
        .map(|key| (key.to_string(), None))
        .collect();
    for (key, value) in set {
        match vars.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = Some(value.to_string()),
            None => vars.push((key.to_string(), Some(value.to_string()))),
        }
    }
    temp_env::with_vars(vars, f)
}

/// Environment variables bound by [`crate::settings::Base`].
pub const BASE_ENV_KEYS: &[&str] = &[
    "AZURE_STORAGE_ACCOUNT",
    "AZURE_STORAGE_ACCESS_KEY",
    "GCP_PROJECT",
    "AWS_ENABLED",
    "SCHEME",
    "DEBUG",
    "HTTP_PLATFORM_PORT",
    "HTTPS_PLATFORM_PORT",
    "PORT",
];

/// Write `content` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}
