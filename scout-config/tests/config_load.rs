use scout_common::observability::LogFormat;
use scout_config::ScoutConfigLoader;
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
browser:
  webdriver_url: "${SCOUT_TEST_GRID}"
  headless: true
scenarios:
  threshold_millions: 7.5
  page_bound: 3
timeouts:
  element_ms: 8000
logging:
  format: json
  stderr: true
"#;
    let p = write_yaml(&tmp, "scout.yaml", file_yaml);

    let config = temp_env::with_var("SCOUT_TEST_GRID", Some("http://grid:4444"), || {
        ScoutConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load scout config")
    });

    assert_eq!(config.browser.webdriver_url, "http://grid:4444");
    assert!(config.browser.headless);
    assert_eq!(config.scenarios.threshold_millions, 7.5);
    assert_eq!(config.scenarios.page_bound, 3);
    assert_eq!(config.scenarios.top_n, 10);
    assert_eq!(config.timeouts.element_ms, 8000);
    assert_eq!(config.timeouts.settle_ms, 500);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "scout.yaml", "scenarios:\n  top_n: 10\n");

    let config = temp_env::with_vars(
        [
            ("SCOUT__SCENARIOS__TOP_N", Some("4")),
            ("SCOUT__BROWSER__HEADLESS", Some("true")),
        ],
        || ScoutConfigLoader::new().with_file(&p).load().unwrap(),
    );

    assert_eq!(config.scenarios.top_n, 4);
    assert!(config.browser.headless);
}

#[test]
#[serial]
fn missing_optional_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = ScoutConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults");

    assert_eq!(config.table.path_fragment, "indices/ftse-100/constituents");
    assert_eq!(config.table.columns.name_index, 1);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = ScoutConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(result.is_err());
}
