//! Tests for segment analysis

use course_profile::segments::{FINISH_LABEL, START_LABEL};
use course_profile::{
    build_course_report, calculate_segment_stats, segment_stats, Checkpoint, Coordinate,
    ProcessingConfig, Track,
};

fn three_point_track() -> Track {
    Track::from_coordinates(&[
        Coordinate::new(0.0, 0.0, 0.0),
        Coordinate::new(0.0, 0.0144, 30.48),
        Coordinate::new(0.0, 0.0288, 15.24),
    ])
    .unwrap()
}

/// Saw-tooth elevation along a straight line.
fn hilly_track() -> Track {
    let coords: Vec<Coordinate> = (0..200)
        .map(|i| {
            let t = i as f64;
            Coordinate::new(-120.0, 38.0 + t * 0.0015, 1000.0 + (t * 0.3).sin() * 40.0 + t * 0.7)
        })
        .collect();
    Track::from_coordinates(&coords).unwrap()
}

#[test]
fn test_three_point_gain_and_loss() {
    let stats = calculate_segment_stats(&three_point_track(), 0.0, 2.0).unwrap();
    assert_eq!(stats.elevation_gain_ft, 100);
    assert_eq!(stats.elevation_loss_ft, 50);
    assert_eq!(stats.distance, 2.0);
}

#[test]
fn test_split_range_matches_full_range() {
    let track = hilly_track();
    let total = track.total_distance().unwrap();
    let full = calculate_segment_stats(&track, 0.0, total).unwrap();

    for split in [17, 64, 100, 151] {
        let mid = track.points()[split].distance;
        let left = calculate_segment_stats(&track, 0.0, mid).unwrap();
        let right = calculate_segment_stats(&track, mid, total).unwrap();

        let gain = left.elevation_gain_ft + right.elevation_gain_ft;
        let loss = left.elevation_loss_ft + right.elevation_loss_ft;
        assert!((gain - full.elevation_gain_ft).abs() <= 1, "gain split at {}", split);
        assert!((loss - full.elevation_loss_ft).abs() <= 1, "loss split at {}", split);
    }
}

#[test]
fn test_out_of_range_is_an_error_value() {
    let track = three_point_track();
    let stats = segment_stats(&track, "Ridge", "Nowhere", 10.0, 12.0);

    assert!(stats.is_error());
    assert_eq!(stats.start_label(), "Ridge");
    assert_eq!(stats.end_label(), "Nowhere");
    assert_eq!(stats.distance(), 2.0);
    assert_eq!(
        stats.error(),
        Some("No track points found between miles 10 and 12")
    );
    assert!(stats.elevation().is_none());
}

#[test]
fn test_report_covers_every_segment() {
    let track = hilly_track();
    let total = track.total_distance().unwrap();
    let checkpoints = vec![
        Checkpoint::new("Second", total * 0.66),
        Checkpoint::new("First", total * 0.33),
    ];

    let report = build_course_report(&track, &checkpoints, &ProcessingConfig::default()).unwrap();

    assert_eq!(report.total_distance, total);
    assert_eq!(report.segments.len(), 3);
    assert_eq!(report.segments[0].start_label(), START_LABEL);
    assert_eq!(report.segments[0].end_label(), "First");
    assert_eq!(report.segments[1].start_label(), "First");
    assert_eq!(report.segments[2].end_label(), FINISH_LABEL);
    assert!(report.segments.iter().all(|s| !s.is_error()));

    let distance_sum: f64 = report.segments.iter().map(|s| s.distance()).sum();
    assert!((distance_sum - total).abs() < 1e-9);

    assert_eq!(report.elevation_profile.len(), track.len());
    let names: Vec<&str> = report.aid_stations.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert!(report.aid_stations.iter().all(|a| a.elevation_ft.is_some()));
}

#[test]
fn test_report_json_shape() {
    let report = build_course_report(
        &three_point_track(),
        &[Checkpoint::new("Ridge", 1.0)],
        &ProcessingConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["segments"][0]["start_label"], "Start");
    assert_eq!(json["segments"][0]["end_label"], "Ridge");
    assert!(json["segments"][0]["elevation_gain_ft"].is_i64());
    assert_eq!(json["aid_stations"][0]["mile"], 1.0);
    assert_eq!(json["elevation_profile"].as_array().unwrap().len(), 3);
}

#[test]
fn test_elevation_gap_keeps_change_across_it() {
    let track = Track::from_coordinates(&[
        Coordinate::new(0.0, 0.0, 100.0),
        Coordinate::new(0.0, 0.001, f64::NAN),
        Coordinate::new(0.0, 0.002, f64::NAN),
        Coordinate::new(0.0, 0.003, 130.48),
        Coordinate::new(0.0, 0.004, 115.24),
    ])
    .unwrap();
    let total = track.total_distance().unwrap();

    let stats = calculate_segment_stats(&track, 0.0, total).unwrap();
    assert_eq!(stats.elevation_gain_ft, 100);
    assert_eq!(stats.elevation_loss_ft, 50);

    // A range starting inside the gap measures from its first known elevation
    let from_gap = calculate_segment_stats(&track, track.points()[1].distance, total).unwrap();
    assert_eq!(from_gap.elevation_gain_ft, 0);
    assert_eq!(from_gap.elevation_loss_ft, 50);
}
