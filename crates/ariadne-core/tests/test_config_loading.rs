//! Integration tests for configuration loading.
//!
//! Tests config file parsing, defaults, and loading behavior.

use ariadne_core::{AdapterConfig, AriadneAdapter, AriadneError, MemoryCms, StorageAdapter};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_load_defaults_when_missing() {
    let temp_dir = TempDir::new().unwrap();

    let config = AdapterConfig::load(temp_dir.path().to_path_buf()).unwrap();

    assert_eq!(config.workdir, temp_dir.path().to_path_buf());
    assert_eq!(config.root_path, "/");
    assert_eq!(config.fallback_mimetype, "text/turtle");
    assert_eq!(config.default_nls, "nl");
    assert_eq!(
        config.store_file,
        temp_dir.path().join(".ariadne/store.json")
    );
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let ariadne_dir = temp_dir.path().join(".ariadne");
    fs::create_dir_all(&ariadne_dir).unwrap();

    let config_content = r#"
[adapter]
root_path = "sites//demo"
fallback_mimetype = "application/octet-stream"

[store]
file = "data/cms.json"
default_nls = "en"
"#;
    fs::write(ariadne_dir.join("config.toml"), config_content).unwrap();

    let config = AdapterConfig::load(temp_dir.path().to_path_buf()).unwrap();

    assert_eq!(config.root_path, "/sites/demo/");
    assert_eq!(config.fallback_mimetype, "application/octet-stream");
    assert_eq!(config.default_nls, "en");
    assert_eq!(config.store_file, temp_dir.path().join("data/cms.json"));
}

#[test]
fn test_config_partial_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let ariadne_dir = temp_dir.path().join(".ariadne");
    fs::create_dir_all(&ariadne_dir).unwrap();

    fs::write(
        ariadne_dir.join("config.toml"),
        "[adapter]\nroot_path = \"/intranet/\"\n",
    )
    .unwrap();

    let config = AdapterConfig::load(temp_dir.path().to_path_buf()).unwrap();

    // Overridden value
    assert_eq!(config.root_path, "/intranet/");

    // Defaults preserved
    assert_eq!(config.fallback_mimetype, "text/turtle");
    assert_eq!(config.default_nls, "nl");
}

#[test]
fn test_config_invalid_toml_fails() {
    let temp_dir = TempDir::new().unwrap();
    let ariadne_dir = temp_dir.path().join(".ariadne");
    fs::create_dir_all(&ariadne_dir).unwrap();

    fs::write(ariadne_dir.join("config.toml"), "invalid { toml").unwrap();

    let result = AdapterConfig::load(temp_dir.path().to_path_buf());
    assert!(matches!(result, Err(AriadneError::ConfigParseError(_))));
}

#[test]
fn test_config_load_from_missing_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let result = AdapterConfig::load_from(temp_dir.path().to_path_buf(), &missing);
    assert!(matches!(result, Err(AriadneError::ConfigNotFound(_))));
}

#[test]
fn test_adapter_from_config_uses_fallback_mimetype() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("custom.toml");
    fs::write(
        &file,
        "[adapter]\nroot_path = \"/site\"\nfallback_mimetype = \"text/plain\"\n",
    )
    .unwrap();

    let config = AdapterConfig::load_from(temp_dir.path().to_path_buf(), &file).unwrap();
    let cms = MemoryCms::with_root(&config.root_path, &config.default_nls);
    let adapter = AriadneAdapter::from_config(cms, &config).unwrap();

    adapter.write("notes.txt", b"plain").unwrap();
    assert_eq!(adapter.root_path(), "/site/");
    assert_eq!(adapter.get_metadata("notes.txt").unwrap().mimetype, "text/plain");
}
