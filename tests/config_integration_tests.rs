//! Integration tests for config and metadata fixture files.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

fn read_sample_section() -> toml::Value {
    let value: toml::Value = toml::from_str(&read_sample_config()).expect("should parse");
    value.get("epalign").cloned().expect("should have epalign section")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn epalign_section_has_expected_structure() {
    let epalign = read_sample_section();

    for key in [
        "debug",
        "verbose",
        "recurse",
        "print",
        "stacked_diff",
        "extensions",
        "include",
        "exclude",
    ] {
        assert!(epalign.get(key).is_some(), "Section should have key '{key}'");
    }
}

#[test]
fn config_values_have_correct_types() {
    let epalign = read_sample_section();

    assert!(epalign.get("debug").unwrap().is_bool());
    assert!(epalign.get("recurse").unwrap().is_bool());
    assert!(epalign.get("stacked_diff").unwrap().is_bool());

    let extensions = epalign.get("extensions").unwrap().as_array().unwrap();
    assert!(extensions.iter().all(toml::Value::is_str));
    assert!(epalign.get("exclude").unwrap().is_array());
}

#[test]
fn config_path_points_to_user_config_dir() {
    if let Some(path) = episode_align::config::CONFIG_PATH.as_deref() {
        assert_eq!(path.file_name().unwrap(), "episode-align.toml");
        assert!(path.parent().unwrap().ends_with(".config"));
    }
}

#[test]
fn episode_fixture_is_valid_json() {
    let content = fs::read_to_string("tests/fixtures/episodes.json").expect("Failed to read episode fixture");
    let value: serde_json::Value = serde_json::from_str(&content).expect("should parse");
    let records = value.as_array().expect("should be an array");

    assert_eq!(records.len(), 7);
    for record in records {
        assert!(record.get("season").unwrap().is_u64());
        assert!(record.get("episode").unwrap().is_u64());
        assert!(record.get("name").unwrap().is_string());
    }
    assert!(records[6].get("order").unwrap().is_f64());
}
