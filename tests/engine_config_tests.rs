use chart_annotations::AnnotationEngineConfig;
use chart_annotations::annotation::{AnnotationStyle, DEFAULT_HISTORY_LIMIT, SnapMode};
use std::time::Duration;

#[test]
fn defaults_are_valid() {
    let config = AnnotationEngineConfig::default();

    config.validate().expect("default config");
    assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(config.warning_interval(), Duration::from_millis(800));
    assert!(config.snap.enabled);
    assert_eq!(config.snap.mode, SnapMode::Ohlc);
}

#[test]
fn json_round_trip_preserves_values() {
    let config = AnnotationEngineConfig::default()
        .with_hit_tolerance_px(8.0)
        .with_history_limit(32)
        .with_pixel_ratio(2.0)
        .with_default_style(AnnotationStyle::default().with_stroke_width(2.5));

    let json = config.to_json_pretty().expect("serialize");
    let restored = AnnotationEngineConfig::from_json_str(&json).expect("parse");

    assert_eq!(restored, config);
}

#[test]
fn partial_json_fills_missing_fields_with_defaults() {
    let config = AnnotationEngineConfig::from_json_str(
        r#"{"hit_tolerance_px": 9.0, "snap": {"enabled": false, "mode": "close", "radius_px": 4.0}}"#,
    )
    .expect("parse");

    assert_eq!(config.hit_tolerance_px, 9.0);
    assert!(!config.snap.enabled);
    assert_eq!(config.snap.mode, SnapMode::Close);
    assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(AnnotationEngineConfig::from_json_str(r#"{"hit_tolerance_px": -1.0}"#).is_err());
    assert!(AnnotationEngineConfig::from_json_str(r#"{"history_limit": 0}"#).is_err());
    assert!(AnnotationEngineConfig::from_json_str("not json").is_err());
    assert!(
        AnnotationEngineConfig::default()
            .with_pixel_ratio(f64::NAN)
            .validate()
            .is_err()
    );
}
