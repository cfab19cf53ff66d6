//! Routes as exchanged with a routing provider: measured legs carrying encoded polylines.

use rayon::prelude::*;
use tracing::debug;

use crate::format::Measurement;
use crate::polyline::{decode_or_empty, PolylineCodec};
use crate::types::{Coordinate, Region};
use crate::util::{fit_region, haversine_distance};

/// Average speed assumed for straight-line estimates, in meters per second (500 m/min).
pub const DEFAULT_SPEED: f64 = 500.0 / 60.0;

/// One maneuver of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub distance: Measurement,
    pub duration: Measurement,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
    pub polyline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub distance: Measurement,
    pub duration: Measurement,
    /// Overview path, encoded with whichever codec produced the route.
    pub polyline: String,
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Estimate a direct route: great-circle distance rounded to the meter, travel time in whole
    /// minutes at `speed` meters per second, and a two-point polyline.
    pub fn straight_line<C: PolylineCodec + ?Sized>(origin: Coordinate,
                                                    destination: Coordinate,
                                                    speed: f64,
                                                    codec: &C)
                                                    -> Route {
        let meters = haversine_distance(origin, destination).round();
        let minutes = (meters / (speed * 60.0)).round();
        debug!(meters, minutes, "estimated straight-line route");
        Route {
            origin: origin,
            destination: destination,
            distance: Measurement::distance(meters),
            duration: Measurement::duration(minutes * 60.0),
            polyline: codec.encode(&[origin, destination]),
            steps: Vec::new(),
        }
    }

    /// Overview path. A polyline that fails to decode yields an empty path.
    pub fn path<C: PolylineCodec + ?Sized>(&self, codec: &C) -> Vec<Coordinate> {
        decode_or_empty(codec, &self.polyline)
    }

    /// Paths of every step, decoded in parallel; malformed steps come back empty.
    pub fn step_paths<C: PolylineCodec + ?Sized>(&self, codec: &C) -> Vec<Vec<Coordinate>> {
        self.steps
            .par_iter()
            .map(|s| decode_or_empty(codec, &s.polyline))
            .collect()
    }

    /// Region showing the whole overview path, or just the endpoints when the path is empty.
    pub fn region<C: PolylineCodec + ?Sized>(&self, codec: &C, padding: f64) -> Region {
        let path = self.path(codec);
        fit_region(&path, padding)
            .or_else(|| fit_region(&[self.origin, self.destination], padding))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::{ClassicPolyline, Codec, FlexiblePolyline};

    const ZOCALO: Coordinate = Coordinate::new(19.4326, -99.1332);
    const CHAPULTEPEC: Coordinate = Coordinate::new(19.4234, -99.1685);

    fn step(polyline: &str) -> RouteStep {
        RouteStep {
            distance: Measurement::distance(120),
            duration: Measurement::duration(30),
            start_location: ZOCALO,
            end_location: CHAPULTEPEC,
            instruction: "Gira a la derecha".to_string(),
            maneuver: Some("turn-right".to_string()),
            polyline: polyline.to_string(),
        }
    }

    #[test]
    fn straight_line_estimate() {
        let route = Route::straight_line(ZOCALO, CHAPULTEPEC, DEFAULT_SPEED, &ClassicPolyline);
        assert_eq!(route.distance.value(), 3840.0);
        assert_eq!(route.distance.text(), "3.8 km");
        assert_eq!(route.duration.value(), 480.0);
        assert_eq!(route.duration.text(), "8 min");
        assert!(route.steps.is_empty());
        assert_eq!(route.polyline, ClassicPolyline.encode(&[ZOCALO, CHAPULTEPEC]));
    }

    #[test]
    fn path_uses_the_given_codec() {
        let codec = Codec::from(FlexiblePolyline::default());
        let route = Route::straight_line(ZOCALO, CHAPULTEPEC, DEFAULT_SPEED, &codec);
        assert!(route.polyline.starts_with("BF"));
        let path = route.path(&codec);
        assert_eq!(path.len(), 2);
        assert_abs_diff_eq!(path[1].longitude, CHAPULTEPEC.longitude, epsilon = 1e-5);
    }

    #[test]
    fn step_paths_degrade_individually() {
        let mut route = Route::straight_line(ZOCALO, CHAPULTEPEC, DEFAULT_SPEED, &ClassicPolyline);
        route.steps = vec![step("_p~iF~ps|U_ulLnnqC"), step("_p~iF"), step("")];
        let paths = route.step_paths(&ClassicPolyline);
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].len(), 2);
        assert!(paths[1].is_empty());
        assert!(paths[2].is_empty());
    }

    #[test]
    fn region_falls_back_to_endpoints() {
        let mut route = Route::straight_line(ZOCALO, CHAPULTEPEC, DEFAULT_SPEED, &ClassicPolyline);
        let fitted = route.region(&ClassicPolyline, 1.2);
        assert!(fitted.contains(ZOCALO) && fitted.contains(CHAPULTEPEC));
        route.polyline = "broken polyline".to_string();
        assert_eq!(route.region(&ClassicPolyline, 1.2),
                   fit_region(&[ZOCALO, CHAPULTEPEC], 1.2).unwrap());
    }

    #[test]
    fn serializes_camel_case_steps() {
        let json = ::serde_json::to_value(step("??")).unwrap();
        assert_eq!(json["startLocation"]["latitude"], 19.4326);
        assert_eq!(json["distance"]["text"], "120 m");
        assert_eq!(json["maneuver"], "turn-right");
    }
}
