use scout_common::observability::LogFormat;
use scout_config::{ScoutConfigError, ScoutConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
platform: gfg
comments_limit: 3
http:
  timeout_secs: 20
retry:
  max_attempts: 4
geeksforgeeks:
  site_base: "${SCOUT_TEST_SITE}"
logging:
  format: json
  stderr: true
  "#;
    let p = write_yaml(&tmp, "scout.yaml", file_yaml);

    let config = temp_env::with_var("SCOUT_TEST_SITE", Some("http://127.0.0.1:9"), || {
        ScoutConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load scout config")
    });

    assert_eq!(config.platform, "gfg");
    assert_eq!(config.comments_limit, 3);
    assert_eq!(config.http.timeout_secs, 20);
    assert_eq!(config.http.connect_timeout_secs, 5);
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.min_backoff_ms, 4_000);
    assert_eq!(config.geeksforgeeks.site_base, "http://127.0.0.1:9");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.stderr);
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "scout.yaml", "comments_limit: 3\nretry:\n  max_attempts: 2\n");

    let config = temp_env::with_vars(
        [
            ("SCOUT_COMMENTS_LIMIT", Some("7")),
            ("SCOUT_RETRY__MAX_ATTEMPTS", Some("5")),
        ],
        || ScoutConfigLoader::new().with_file(&p).load().expect("load"),
    );

    assert_eq!(config.comments_limit, 7);
    assert_eq!(config.retry.max_attempts, 5);
}

#[test]
#[serial]
fn optional_file_may_be_missing() {
    let tmp = TempDir::new().unwrap();
    let config = ScoutConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.comments_limit, 5);
    assert_eq!(config.platform, "geeksforgeeks");
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let err = ScoutConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ScoutConfigError::Source(_)));
}

#[test]
#[serial]
fn invalid_backoff_window_is_rejected() {
    let err = ScoutConfigLoader::new()
        .with_yaml_str("retry:\n  min_backoff_ms: 20000\n  max_backoff_ms: 10\n")
        .load()
        .unwrap_err();
    assert!(matches!(err, ScoutConfigError::Invalid(_)));
}
