//! GPX reading: turns a GPX document into a [`TrackInput`].
//!
//! Only geometry and named waypoints are read. Times, extensions and any
//! tracks after the first are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::{ProfileError, Result};
use crate::{Coordinate, Marker, TrackInput};

/// Name given to a `<wpt>` without a `<name>`.
pub const UNNAMED_WAYPOINT: &str = "Unnamed Waypoint";

fn to_coordinate(point: &gpx::Waypoint) -> Coordinate {
    let position = point.point();
    Coordinate::new(
        position.x(),
        position.y(),
        point.elevation.unwrap_or(f64::NAN),
    )
}

/// Read a GPX document.
///
/// Points come from every segment of the first track, in order; a file without
/// tracks falls back to its first route. Missing elevations become NaN.
pub fn read_gpx<R: Read>(reader: R) -> Result<TrackInput> {
    let gpx = gpx::read(reader).map_err(|e| ProfileError::Parse {
        message: e.to_string(),
    })?;

    let coordinates: Vec<Coordinate> = match gpx.tracks.first() {
        Some(track) => track
            .segments
            .iter()
            .flat_map(|segment| segment.points.iter())
            .map(to_coordinate)
            .collect(),
        None => gpx
            .routes
            .first()
            .map(|route| route.points.iter().map(to_coordinate).collect())
            .unwrap_or_default(),
    };

    if coordinates.is_empty() {
        return Err(ProfileError::Parse {
            message: "No track data found in GPX file".to_string(),
        });
    }

    let markers: Vec<Marker> = gpx
        .waypoints
        .iter()
        .map(|wpt| {
            let position = wpt.point();
            let name = wpt.name.clone().unwrap_or_else(|| UNNAMED_WAYPOINT.to_string());
            Marker::new(name, position.x(), position.y())
        })
        .collect();

    debug!(
        "[GpxInput] {} points, {} waypoints",
        coordinates.len(),
        markers.len()
    );

    Ok(TrackInput {
        coordinates,
        markers,
    })
}

/// Read a GPX file from disk.
pub fn read_gpx_file(path: impl AsRef<Path>) -> Result<TrackInput> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProfileError::Parse {
        message: format!("{}: {}", path.display(), e),
    })?;
    read_gpx(BufReader::new(file))
}
