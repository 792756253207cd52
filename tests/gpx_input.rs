//! Tests for the GPX adapter
#![cfg(feature = "gpx")]

use course_profile::{read_gpx, ProcessingConfig, TrackEngine};

/// Out-and-back with an aid station passed twice.
fn loop_gpx() -> String {
    let mut trkpts = String::new();
    let step = 0.0015;
    for i in 0..=200 {
        let k = if i <= 100 { i } else { 200 - i };
        trkpts.push_str(&format!(
            "<trkpt lat=\"{:.6}\" lon=\"-105.0\"><ele>{}</ele></trkpt>\n",
            40.0 + k as f64 * step,
            1600 + k
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="40.030000" lon="-105.0"><name>Aid</name></wpt>
  <trk><name>Out and back</name><trkseg>
{}  </trkseg></trk>
</gpx>"#,
        trkpts
    )
}

#[test]
fn test_gpx_to_report() {
    let input = read_gpx(loop_gpx().as_bytes()).unwrap();
    assert_eq!(input.coordinates.len(), 201);
    assert_eq!(input.markers.len(), 1);

    let mut engine = TrackEngine::with_config(ProcessingConfig::default());
    let summary = engine.process("loop", &input).unwrap();
    // Aid at mile ~2.07 on the way out and ~18.6 on the way back
    assert_eq!(summary.waypoints.len(), 2);

    let stations: Vec<_> = summary
        .waypoints
        .iter()
        .enumerate()
        .map(|(i, w)| course_profile::Checkpoint::new(format!("{} #{}", w.name, i + 1), w.distance))
        .collect();
    let report = engine.calculate("loop", &stations).unwrap();
    assert_eq!(report.segments.len(), 3);

    // 100 m up and 100 m down overall
    let gain: i64 = report
        .segments
        .iter()
        .filter_map(|s| s.elevation())
        .map(|(g, _)| g)
        .sum();
    assert!((gain - 328).abs() <= 2);
}
