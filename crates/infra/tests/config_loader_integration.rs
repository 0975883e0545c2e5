//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a service from it.

use std::io::Write;

use sitewit_infra::config;
use sitewit_infra::SiteWitService;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "sitewit": {
                "url": "https://sandboxpapi.sitewit.com",
                "partner_id": "1001",
                "partner_token": "partner-secret",
                "timeout_secs": 15,
                "max_attempts": 3
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.url, "https://sandboxpapi.sitewit.com");
    assert_eq!(config.partner_id, "1001");
    assert_eq!(config.partner_token, "partner-secret");
    assert_eq!(config.timeout_secs, 15);
    assert_eq!(config.max_attempts, 3);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_flat_toml_file() {
    let path = write_config(
        r#"
url = "https://papi.sitewit.com"
partner_id = "1001"
partner_token = "partner-secret"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.url, "https://papi.sitewit.com");
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.max_attempts, 1);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_config_builds_service() {
    let path = write_config(
        r#"{"url": "http://127.0.0.1:9", "partner_id": "1001", "partner_token": "s"}"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    assert!(SiteWitService::from_config(&config).is_ok());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_url_is_config_error() {
    let path = write_config(
        r#"{"url": "not a url", "partner_id": "1001", "partner_token": "s"}"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config should load");
    let err = SiteWitService::from_config(&config).err().expect("invalid URL should fail");
    assert!(matches!(err, sitewit_domain::SiteWitError::Config(_)));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_credentials_fail() {
    let path = write_config(r#"{"url": "https://papi.sitewit.com"}"#, "json");

    assert!(config::load_from_file(Some(path.clone())).is_err());

    std::fs::remove_file(path).ok();
}
