use super::*;

#[test]
fn defaults_are_sane() {
    let config = Config::default();
    assert_eq!(config.service.name, "glossa");
    assert_eq!(config.storage.db_path, "~/.glossa/data/glossa.db");
    assert_eq!(config.storage.max_connections, 4);
    assert_eq!(config.cache.capacity, 1024);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.export.max_export_size, 100_000);
    assert!(!config.export.cdn.enabled);
}

#[test]
fn partial_toml_fills_defaults() {
    let config: Config = toml::from_str(
        r#"
        [storage]
        db_path = "/tmp/test.db"

        [export.cdn]
        enabled = true
        base_url = "https://cdn.example.com"
        "#,
    )
    .unwrap();

    assert_eq!(config.storage.db_path, "/tmp/test.db");
    assert_eq!(config.storage.max_connections, 4);
    assert!(config.export.cdn.enabled);
    assert_eq!(config.export.cdn.base_url, "https://cdn.example.com");
    assert_eq!(config.service.log_level, "info");
}

#[test]
fn empty_toml_is_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.cache.capacity, Config::default().cache.capacity);
}

#[test]
fn shellexpand_home() {
    if std::env::var_os("HOME").is_some() {
        assert!(!shellexpand("~/x").starts_with('~'));
    }
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
}
