//! Override policy tests for the settings loader.

use serial_test::serial;
use tempfile::TempDir;

use super::{OVERRIDE_ENV_KEYS, Override, env_lock, with_env, write_file};
use crate::loader::builder::ConfigLoader;
use crate::loader::merge::OverridePolicy;

fn loader(dir: &TempDir, policy: OverridePolicy) -> ConfigLoader {
    ConfigLoader::new()
        .with_search_path(dir.path())
        .with_file_name("appsettings")
        .with_policy(policy)
}

#[test]
#[serial]
fn test_if_empty_keeps_file_value() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "appsettings.json", r#"{ "localFile": "fromfile" }"#);

    with_env(OVERRIDE_ENV_KEYS, &[("LOCAL_FILE", "fromenv")], || {
        let always: Override = loader(&temp_dir, OverridePolicy::OverrideAlways)
            .load()
            .unwrap();
        let if_empty: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
            .load()
            .unwrap();

        assert_eq!(always.local_file, "fromenv");
        assert_eq!(if_empty.local_file, "fromfile");
    });
}

#[test]
#[serial]
fn test_if_empty_fills_empty_file_value() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "appsettings.json",
        r#"{ "localFile": "", "gcpProject": "from-file" }"#,
    );

    with_env(
        OVERRIDE_ENV_KEYS,
        &[("LOCAL_FILE", "fromenv"), ("AZURE_STORAGE_ACCOUNT", "account")],
        || {
            let settings: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
                .load()
                .unwrap();
            assert_eq!(settings.local_file, "fromenv");
            assert_eq!(settings.common.azure_storage_account, "account");
            assert_eq!(settings.common.gcp_project, "from-file");
        },
    );
}

#[test]
#[serial]
fn test_if_empty_treats_false_as_empty() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "appsettings.json", r#"{ "awsEnabled": false }"#);

    with_env(OVERRIDE_ENV_KEYS, &[("AWS_ENABLED", "true")], || {
        let settings: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
            .load()
            .unwrap();
        assert!(settings.common.aws_enabled);
    });
}

#[test]
#[serial]
fn test_empty_env_only_overrides_under_always() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "appsettings.json", r#"{ "localFile": "fromfile" }"#);

    with_env(OVERRIDE_ENV_KEYS, &[("LOCAL_FILE", "")], || {
        let always: Override = loader(&temp_dir, OverridePolicy::OverrideAlways)
            .load()
            .unwrap();
        let if_empty: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
            .load()
            .unwrap();

        assert_eq!(always.local_file, "");
        assert_eq!(if_empty.local_file, "fromfile");
    });
}

#[test]
#[serial]
fn test_if_empty_does_not_validate_unused_env_value() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "appsettings.json", r#"{ "awsEnabled": true }"#);

    // The file value wins, so the malformed variable is never consulted.
    with_env(OVERRIDE_ENV_KEYS, &[("AWS_ENABLED", "not-a-bool")], || {
        let settings: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
            .load()
            .unwrap();
        assert!(settings.common.aws_enabled);
    });
}

#[cfg(unix)]
#[test]
#[serial]
fn test_non_unicode_env_value_only_fails_when_used() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    use crate::loader::error::{ConfigError, ErrorKind, ValueOrigin};

    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "appsettings.json", r#"{ "localFile": "fromfile" }"#);
    let invalid = OsStr::from_bytes(&[0x66, 0x6f, 0xff]);

    with_env(OVERRIDE_ENV_KEYS, &[], || {
        temp_env::with_var("LOCAL_FILE", Some(invalid), || {
            let if_empty: Override = loader(&temp_dir, OverridePolicy::OverrideIfEmpty)
                .load()
                .unwrap();
            assert_eq!(if_empty.local_file, "fromfile");

            let err = loader(&temp_dir, OverridePolicy::OverrideAlways)
                .load::<Override>()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnmarshalType);
            match err {
                ConfigError::UnmarshalType { path, origin, .. } => {
                    assert_eq!(path, "localFile");
                    assert_eq!(origin, ValueOrigin::Env("LOCAL_FILE".to_string()));
                }
                other => panic!("expected UnmarshalType, got {other:?}"),
            }
        });
    });
}
