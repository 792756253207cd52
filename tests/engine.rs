//! Integration tests for the track engine

use course_profile::{
    with_engine, Checkpoint, Coordinate, Marker, ProcessingConfig, ProfileError, TrackEngine,
    TrackInput,
};

fn course_input() -> TrackInput {
    TrackInput {
        coordinates: (0..120)
            .map(|i| {
                let t = i as f64;
                Coordinate::new(-106.3, 39.0 + t * 0.001, 2800.0 + (t * 0.2).sin() * 30.0)
            })
            .collect(),
        markers: vec![
            Marker::new("Halfmoon", -106.3, 39.04),
            Marker::new("Lost", 10.0, 10.0),
        ],
    }
}

#[test]
fn test_process_then_calculate() {
    let mut engine = TrackEngine::new();
    let summary = engine.process("leadville", &course_input()).unwrap();

    assert_eq!(summary.id, "leadville");
    assert_eq!(summary.point_count, 120);
    assert!(!summary.smoothed);
    assert_eq!(summary.waypoints.len(), 1);
    assert_eq!(summary.waypoints[0].name, "Halfmoon");
    let bounds = summary.bounds.unwrap();
    assert_eq!(bounds.min_lat, 39.0);

    let stations = vec![Checkpoint::new("Halfmoon", summary.waypoints[0].distance)];
    let report = engine.calculate("leadville", &stations).unwrap();
    assert_eq!(report.segments.len(), 2);
    assert_eq!(report.total_distance, summary.total_distance);
    assert!(report.segments.iter().all(|s| !s.is_error()));
}

#[test]
fn test_smoothed_processing() {
    let config = ProcessingConfig::smoothed();
    let mut engine = TrackEngine::with_config(config);
    let summary = engine.process("smooth", &course_input()).unwrap();

    assert!(summary.smoothed);
    let track = engine.track("smooth").unwrap();
    assert_eq!(track.len(), summary.point_count);
    assert_eq!(track.total_distance().unwrap(), summary.total_distance);
}

#[test]
fn test_process_with_overrides_config() {
    let mut engine = TrackEngine::new();
    let summary = engine
        .process_with("once", &course_input(), &ProcessingConfig::smoothed())
        .unwrap();
    assert!(summary.smoothed);
    assert!(!engine.config().enable_smoothing);
}

#[test]
fn test_invalid_config_rejected() {
    let mut engine = TrackEngine::new();
    let bad = ProcessingConfig {
        visit_radius_miles: f64::NAN,
        ..ProcessingConfig::default()
    };
    assert!(matches!(
        engine.process_with("x", &course_input(), &bad),
        Err(ProfileError::Config { .. })
    ));
    assert!(engine.set_config(bad).is_err());
}

#[test]
fn test_unknown_id() {
    let mut engine = TrackEngine::new();
    assert!(matches!(
        engine.segment("nope", 0.0, 1.0),
        Err(ProfileError::NotFound { .. })
    ));
    assert!(matches!(
        engine.track("nope"),
        Err(ProfileError::NotFound { .. })
    ));
    assert!(!engine.remove("nope"));
}

#[test]
fn test_remove_and_clear() {
    let mut engine = TrackEngine::new();
    engine.process("a", &course_input()).unwrap();
    engine.process("b", &course_input()).unwrap();

    assert!(engine.remove("a"));
    assert_eq!(engine.track_count(), 1);

    engine.clear();
    assert_eq!(engine.track_count(), 0);
    assert_eq!(engine.stats().total_points, 0);
}

#[test]
fn test_lru_keeps_recently_used() {
    let mut engine = TrackEngine::with_config(ProcessingConfig {
        max_cached_tracks: 2,
        ..ProcessingConfig::default()
    });
    engine.process("a", &course_input()).unwrap();
    engine.process("b", &course_input()).unwrap();
    // Touch "a" so "b" is the oldest
    engine.waypoints("a").unwrap();
    engine.process("c", &course_input()).unwrap();

    assert!(engine.has_track("a"));
    assert!(!engine.has_track("b"));
    assert!(engine.has_track("c"));
}

#[test]
fn test_waypoints_json() {
    let mut engine = TrackEngine::new();
    engine.process("j", &course_input()).unwrap();
    let json = engine.waypoints_json("j").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["name"], "Halfmoon");
}

#[test]
fn test_waypoints_json_unknown_id() {
    let mut engine = TrackEngine::new();
    assert_eq!(
        engine.waypoints_json("never-uploaded"),
        Err(ProfileError::NotFound {
            track_id: "never-uploaded".to_string()
        })
    );

    // An evicted track is reported the same way
    let mut small = TrackEngine::with_config(ProcessingConfig {
        max_cached_tracks: 1,
        ..ProcessingConfig::default()
    });
    small.process("first", &course_input()).unwrap();
    small.process("second", &course_input()).unwrap();
    assert!(matches!(
        small.waypoints_json("first"),
        Err(ProfileError::NotFound { .. })
    ));
}

#[test]
fn test_global_engine() {
    let summary = with_engine(|e| e.process("global-engine-test", &course_input())).unwrap();
    assert_eq!(summary.point_count, 120);

    assert!(with_engine(|e| e.has_track("global-engine-test")));
    assert!(with_engine(|e| e.remove("global-engine-test")));
}
