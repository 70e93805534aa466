//! YAML config store tests.
//!
//! IMPORTANT: these tests point `PROVCTL_CONFIG` at a temp file, so they are
//! serialised with `#[serial]`.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use std::time::Duration;

use provctl_cli::application::ports::ConfigStore;
use provctl_cli::application::services::config_service;
use provctl_cli::application::services::workflow::WorkflowSettings;
use provctl_cli::infra::config::{CONFIG_ENV, YamlConfigStore};
use serial_test::serial;
use tempfile::TempDir;

fn temp_store() -> (TempDir, YamlConfigStore) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("config.yaml");
    // SAFETY: every test using this helper is #[serial].
    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    (dir, YamlConfigStore::default())
}

#[test]
#[serial]
fn missing_file_loads_defaults() {
    let (_dir, store) = temp_store();
    let config = store.load().expect("defaults");
    assert_eq!(config.server.url, "http://127.0.0.1:5000");
    assert_eq!(config.polling.interval(), Duration::from_secs(1));
    assert_eq!(config.polling.max_duration(), None);
}

#[test]
#[serial]
fn set_value_persists_and_round_trips() {
    let (_dir, store) = temp_store();
    config_service::set_value(&store, "polling.max_duration_secs", "600").expect("valid");
    config_service::set_value(&store, "hostname.domain_suffix", "lab.example.").expect("valid");

    let config = store.load().expect("reload");
    assert_eq!(config.polling.max_duration(), Some(Duration::from_secs(600)));
    assert_eq!(config.hostname.domain_suffix, "lab.example");

    let settings = WorkflowSettings::from(&config);
    assert_eq!(settings.max_poll_duration, Some(Duration::from_secs(600)));
}

#[test]
#[serial]
fn none_clears_an_optional_setting() {
    let (_dir, store) = temp_store();
    config_service::set_value(&store, "server.request_timeout_secs", "30").expect("valid");
    config_service::set_value(&store, "server.request_timeout_secs", "none").expect("valid");
    assert_eq!(store.load().unwrap().server.request_timeout(), None);
}

#[test]
#[serial]
fn invalid_value_writes_nothing() {
    let (_dir, store) = temp_store();
    let err = config_service::set_value(&store, "server.url", "ftp://nope").unwrap_err();
    assert!(err.to_string().contains("server.url"));
    assert!(!store.path().unwrap().exists());
}

#[test]
#[serial]
fn unknown_key_is_rejected() {
    let (_dir, store) = temp_store();
    let err = config_service::set_value(&store, "security.level", "strict").unwrap_err();
    assert!(err.to_string().contains("Unknown setting"));
}

#[test]
#[serial]
fn server_override_does_not_touch_the_file() {
    let (_dir, store) = temp_store();
    let config = config_service::resolve(&store, Some("https://prov.example/")).expect("valid");
    assert_eq!(config.server.url, "https://prov.example");
    assert!(!store.path().unwrap().exists());
}

#[cfg(unix)]
#[test]
#[serial]
fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = temp_store();
    config_service::set_value(&store, "polling.interval_ms", "500").expect("valid");
    let mode = std::fs::metadata(store.path().unwrap())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn pinned_store_replaces_file_without_leftovers() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    let store = YamlConfigStore::at(&path);

    config_service::set_value(&store, "polling.interval_ms", "500").expect("valid");
    config_service::set_value(&store, "polling.interval_ms", "250").expect("valid");

    assert_eq!(store.load().unwrap().polling.interval(), Duration::from_millis(250));
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, [std::ffi::OsString::from("config.yaml")]);
}

#[test]
fn empty_or_broken_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    let store = YamlConfigStore::at(&path);

    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(store.load().unwrap().server.url, "http://127.0.0.1:5000");

    std::fs::write(&path, "server: [not, a, map]\n").unwrap();
    let err = store.load().unwrap_err();
    assert!(format!("{err:#}").contains("cannot parse"));
}
