#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.history_limit, 50);
    assert_eq!(cfg.paste_offset, 20.0);
    assert_eq!(cfg.default_shape_size, Size { width: 120.0, height: 80.0 });
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_json_empty_object_is_default() {
    let cfg = EngineConfig::from_json("{}").unwrap();
    assert_eq!(cfg, EngineConfig::default());
}

#[test]
fn from_json_overrides_selected_fields() {
    let cfg = EngineConfig::from_json(r#"{ "historyLimit": 10, "pasteOffset": 8, "defaultTextSize": { "width": 200, "height": 30 } }"#)
        .unwrap();
    assert_eq!(cfg.history_limit, 10);
    assert_eq!(cfg.paste_offset, 8.0);
    assert_eq!(cfg.default_text_size, Size { width: 200.0, height: 30.0 });
    assert_eq!(cfg.hit_slop_px, EngineConfig::default().hit_slop_px);
}

#[test]
fn from_json_rejects_malformed_input() {
    let err = EngineConfig::from_json("{ historyLimit: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn from_json_rejects_zero_history() {
    let err = EngineConfig::from_json(r#"{ "historyLimit": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "historyLimit", .. }));
}

#[test]
fn validate_rejects_non_positive_radius() {
    let cfg = EngineConfig { anchor_radius_px: 0.0, ..Default::default() };
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "anchorRadiusPx", .. }));
    assert!(err.to_string().contains("anchorRadiusPx"));
}

#[test]
fn validate_rejects_degenerate_default_size() {
    let cfg = EngineConfig { default_shape_size: Size { width: 0.0, height: 10.0 }, ..Default::default() };
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { field: "defaultShapeSize", .. })));
}
