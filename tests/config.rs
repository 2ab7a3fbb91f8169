use std::{fs, path::PathBuf};

use velmodel::config::AppConfig;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(&dir.path().join("config.json"));
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.default_unit, "unitless");
}

#[test]
fn malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(AppConfig::load_from(&path), AppConfig::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "default_unit": "km/s" }"#).unwrap();

    let config = AppConfig::load_from(&path);
    assert_eq!(config.default_unit, "km/s");
    assert_eq!(config.window_size, AppConfig::default().window_size);
    assert!(config.image_path.is_none());
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = AppConfig {
        image_path: Some(PathBuf::from("/data/section.jpg")),
        default_unit: "m/s".to_string(),
        window_size: [900.0, 600.0],
    };

    config.save_to(&path).unwrap();
    assert_eq!(AppConfig::load_from(&path), config);
}

#[test]
fn command_line_image_wins() {
    let config = AppConfig {
        image_path: Some(PathBuf::from("remembered.png")),
        ..AppConfig::default()
    };

    assert_eq!(
        config.resolve_image(Some(PathBuf::from("given.png"))),
        Some(PathBuf::from("given.png"))
    );
    assert_eq!(config.resolve_image(None), Some(PathBuf::from("remembered.png")));
    assert_eq!(AppConfig::default().resolve_image(None), None);
}
