//! Configuration loading feeding into cache construction

use change_cache::config::ConfigLoader;
use change_cache::ChangeCache;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_controls_cache_behavior() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("cache.toml");
    fs::write(
        &config_file,
        r#"
[cache]
recording = true
clear_on_pack = false
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let data = match json!({"gold": 1}) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let mut cache = ChangeCache::with_config(data, &config);
    cache.set("gold", 2);
    assert_eq!(cache.flush().to_value(), json!({"updated": {"gold": 2}}));
    // Not cleared: the same record packs again
    assert_eq!(cache.flush().to_value(), json!({"updated": {"gold": 2}}));
    assert_eq!(cache.pack(true).len(), 1);
    assert!(cache.flush().is_empty());
}

#[test]
fn test_rendered_defaults_load_back() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("cache.toml");
    let defaults = change_cache::config::CacheConfig::default();
    fs::write(&config_file, defaults.to_toml().unwrap()).unwrap();

    let loaded = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(loaded.cache, defaults.cache);
    assert_eq!(loaded.logging.level, defaults.logging.level);
}
