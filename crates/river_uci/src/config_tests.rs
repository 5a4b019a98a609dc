use super::*;

#[test]
fn test_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.name, "River");
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.nodes_per_tick, 512);
    assert!(!config.debug);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = EngineConfig::from_toml("max_depth = 6\ndebug = true\n").expect("valid toml");
    assert_eq!(config.max_depth, 6);
    assert!(config.debug);
    assert_eq!(config.author, "River developers");
    assert_eq!(config.nodes_per_tick, 512);
}

#[test]
fn test_values_are_clamped() {
    let config =
        EngineConfig::from_toml("max_depth = 0\nnodes_per_tick = 0\n").expect("valid toml");
    assert_eq!(config.max_depth, 1);
    assert_eq!(config.nodes_per_tick, 1);

    let config = EngineConfig::from_toml("max_depth = 200\n").expect("valid toml");
    assert_eq!(config.max_depth, MAX_DEPTH);
}

#[test]
fn test_bad_toml_rejected() {
    assert!(EngineConfig::from_toml("max_depth = \"deep\"").is_err());
    assert!(EngineConfig::from_toml("max_depth = 300").is_err()); // out of u8
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("river_config_{}.toml", std::process::id()));
    std::fs::write(&path, "name = \"Test River\"\n").expect("temp file writable");
    let config = EngineConfig::load(path.to_str()).expect("loads");
    assert_eq!(config.name, "Test River");
    std::fs::remove_file(&path).ok();

    assert!(EngineConfig::load(Some("/nonexistent/river.toml")).is_err());
}
