use super::load_existing_config as load_existing_config_impl;
use crate::config::{DEFAULT_INDEX_NAME, DEFAULT_TOP_K};
use tempfile::TempDir;

#[test]
fn load_existing_config_defaults_when_missing() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let config = load_existing_config_impl(temp_dir.path()).expect("config loaded successfully");
    assert_eq!(config.cache.index_name, DEFAULT_INDEX_NAME);
    assert_eq!(config.cache.top_k, DEFAULT_TOP_K);
    assert_eq!(config.get_base_dir(), temp_dir.path());
}

#[test]
fn load_existing_config_reads_saved_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let mut config =
        load_existing_config_impl(temp_dir.path()).expect("config loaded successfully");
    config
        .cache
        .set_index_name("support_answers".to_string())
        .expect("index name should be valid");
    config.save().expect("config should save");

    let reloaded = load_existing_config_impl(temp_dir.path()).expect("config loaded successfully");
    assert_eq!(reloaded.cache.index_name, "support_answers");
}

#[test]
fn unreachable_marqo_is_reported() {
    let mut marqo = crate::config::MarqoConfig::default();
    marqo
        .set_url("http://127.0.0.1:1")
        .expect("url should be valid");

    assert!(!super::test_marqo_connection(&marqo));
}
