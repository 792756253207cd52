//! Tests for geo_utils module

use course_profile::geo_utils::{
    compute_bounds, haversine_distance, point_distance, polyline_length, EARTH_RADIUS_KM,
    KM_TO_MILES,
};
use course_profile::TrackPoint;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_haversine_same_point() {
    assert_eq!(haversine_distance(39.1, -106.4, 39.1, -106.4), 0.0);
}

#[test]
fn test_haversine_symmetric() {
    let there = haversine_distance(39.1911, -106.8175, 39.0811, -106.3109);
    let back = haversine_distance(39.0811, -106.3109, 39.1911, -106.8175);
    assert!(approx_eq(there, back, 1e-12));
}

#[test]
fn test_haversine_one_degree_of_latitude() {
    let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians() * KM_TO_MILES;
    let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
    assert!(approx_eq(d, expected, 1e-9));
    assert!(approx_eq(d, 69.09, 0.01));
}

#[test]
fn test_haversine_antipodal() {
    let d = haversine_distance(0.0, 0.0, 0.0, 180.0);
    let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM * KM_TO_MILES;
    assert!(approx_eq(d, half_circumference, 1e-6));
}

#[test]
fn test_polyline_length_matches_legs() {
    let points: Vec<TrackPoint> = (0..5)
        .map(|i| TrackPoint::new(-105.0 + i as f64 * 0.01, 40.0, 0.0))
        .collect();
    let legs: f64 = points
        .windows(2)
        .map(|w| point_distance(&w[0], &w[1]))
        .sum();
    assert_eq!(polyline_length(&points), legs);
    assert_eq!(polyline_length(&points[..1]), 0.0);
}

#[test]
fn test_compute_bounds() {
    let points = vec![
        TrackPoint::new(-105.2, 40.1, 0.0),
        TrackPoint::new(-105.0, 39.9, 0.0),
        TrackPoint::new(-105.1, 40.3, 0.0),
    ];
    let bounds = compute_bounds(&points).unwrap();
    assert_eq!(bounds.min_lat, 39.9);
    assert_eq!(bounds.max_lat, 40.3);
    assert_eq!(bounds.min_lng, -105.2);
    assert_eq!(bounds.max_lng, -105.0);

    assert!(compute_bounds(&[]).is_none());
}
