use std::io::Read;

use geojson::{GeoJson, Geometry, Value};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::types::{Bounds, Coordinate, Region};

/// Mean earth radius in meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;
/// Multiplier applied to the span of fitted regions so points do not sit on the edge.
pub const DEFAULT_PADDING: f64 = 1.2;
/// Smallest latitude/longitude delta of a fitted region, in degrees.
pub const MIN_REGION_DELTA: f64 = 0.01;


/// Great-circle distance in meters between two coordinates, by the Haversine formula.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2) +
            lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS * c
}

/// Total length in meters of the path through the given coordinates.
/// Segments are measured in parallel.
pub fn path_length(path: &[Coordinate]) -> f64 {
    path.par_windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}


/// Find the bounds over an iterator of coordinates.
pub fn coordinate_bounds<'a, I: Iterator<Item = &'a Coordinate>>(iter: I) -> Bounds {
    iter.fold(Bounds {
                  north: f64::MIN,
                  south: f64::MAX,
                  east: f64::MIN,
                  west: f64::MAX,
              },
              |b, c| {
        Bounds {
            north: f64::max(b.north, c.latitude),
            south: f64::min(b.south, c.latitude),
            east: f64::max(b.east, c.longitude),
            west: f64::min(b.west, c.longitude),
        }
    })
}

/// Fit a region around the coordinates: centered on the middle of their bounding box with each
/// span multiplied by `padding`, but never smaller than `MIN_REGION_DELTA`. A single coordinate
/// gets the minimum span regardless of padding. Returns `None` when there is nothing to fit.
pub fn fit_region(coordinates: &[Coordinate], padding: f64) -> Option<Region> {
    match coordinates {
        [] => None,
        [only] => {
            Some(Region {
                center: *only,
                latitude_delta: MIN_REGION_DELTA,
                longitude_delta: MIN_REGION_DELTA,
            })
        }
        _ => {
            let bounds = coordinate_bounds(coordinates.iter());
            Some(Region {
                center: bounds.center(),
                latitude_delta: f64::max(bounds.range_lat() * padding, MIN_REGION_DELTA),
                longitude_delta: f64::max(bounds.range_lon() * padding, MIN_REGION_DELTA),
            })
        }
    }
}

/// Like `fit_region`, falling back to `default` for an empty slice.
pub fn fit_region_or(coordinates: &[Coordinate], padding: f64, default: Region) -> Region {
    fit_region(coordinates, padding).unwrap_or(default)
}


/// Read the first LineString found in a GeoJSON document, which may be a bare geometry, a
/// feature or a feature collection. GeoJSON positions are `[longitude, latitude, ...]`.
pub fn path_from_geojson<R: Read>(reader: R) -> Result<Vec<Coordinate>> {
    let json = ::serde_json::from_reader::<_, GeoJson>(reader)?;
    let line = match json {
        GeoJson::Geometry(ref g) => line_string(&g.value),
        GeoJson::Feature(ref f) => f.geometry.as_ref().and_then(|g| line_string(&g.value)),
        GeoJson::FeatureCollection(ref fc) => {
            fc.features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .filter_map(|g| line_string(&g.value))
                .next()
        }
    };
    let positions = line.ok_or(Error::NoLineString)?;
    positions.iter()
        .enumerate()
        .map(|(index, pos)| match (pos.get(1), pos.get(0)) {
            (Some(&lat), Some(&lon)) => Ok(Coordinate::new(lat, lon)),
            _ => Err(Error::InvalidPosition { index: index }),
        })
        .collect()
}

fn line_string(value: &Value) -> Option<&[Vec<f64>]> {
    match *value {
        Value::LineString(ref positions) => Some(&positions[..]),
        Value::GeometryCollection(ref geometries) => {
            geometries.iter().filter_map(|g| line_string(&g.value)).next()
        }
        _ => None,
    }
}

/// Build a GeoJSON LineString geometry through the given coordinates.
pub fn path_to_geojson(path: &[Coordinate]) -> Geometry {
    Geometry::new(Value::LineString(path.iter()
        .map(|c| vec![c.longitude, c.latitude])
        .collect()))
}
