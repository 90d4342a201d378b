//! Integration tests for Settings loading with an explicit config file.
//!
//! These tests do not touch the global config location or DSINTERP_*
//! variables; they only layer temp files over the compiled defaults.

use std::fs;

use tempfile::TempDir;

use dsinterp::application::services::FailurePolicy;
use dsinterp::application::{ApplicationError, ErrorKind};
use dsinterp::config::{global_config_path, Settings};

#[test]
fn given_explicit_file_when_loading_then_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
on_error = "continue"
time_format = "%H:%M"
show_structure = true
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.on_error, FailurePolicy::Continue);
    assert_eq!(settings.time_format, "%H:%M");
    assert!(settings.show_structure);
    assert!(settings.record_failures, "unspecified field keeps default");
}

#[test]
fn given_missing_explicit_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn given_malformed_file_when_loading_then_config_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "on_error = \"sometimes\"\n").unwrap();

    match Settings::load(Some(&path)) {
        Err(ApplicationError::Config { message }) => assert!(message.contains("broken.toml")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_effective_settings_when_written_and_reloaded_then_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roundtrip.toml");
    let original = Settings {
        on_error: FailurePolicy::Continue,
        record_failures: false,
        time_format: "%Y-%m-%d %H:%M:%S".into(),
        show_structure: true,
    };
    fs::write(&path, original.to_toml().unwrap()).unwrap();

    assert_eq!(Settings::load(Some(&path)).unwrap(), original);
}

#[test]
fn given_platform_dirs_when_resolving_global_path_then_named_after_crate() {
    if let Some(path) = global_config_path() {
        assert!(path.ends_with("dsinterp.toml"));
    }
}
