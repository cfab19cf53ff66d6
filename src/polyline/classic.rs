use tracing::debug;

use super::{accumulate, write_signed, PolylineCodec, ValueReader};
use crate::error::DecodeError;
use crate::types::Coordinate;

const SCALE: f64 = 1e5;
const OFFSET: u8 = 63;

/// Google encoded polyline format at a fixed 1e-5 degree scale (about 1.1 m).
///
/// Each 5-bit group is offset by 63 to land in the printable ASCII range `?` through `~`.
/// There is no header, so an empty path encodes to an empty string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassicPolyline;

#[inline]
fn symbol(group: u8) -> char {
    (group + OFFSET) as char
}

#[inline]
fn lookup(byte: u8) -> Option<u8> {
    if byte >= OFFSET && byte <= OFFSET + 0x3f {
        Some(byte - OFFSET)
    } else {
        None
    }
}

/// Round half up, the way the reference encoders in JavaScript and Java do it.
#[inline]
fn scale(value: f64) -> i64 {
    (value * SCALE + 0.5).floor() as i64
}

impl PolylineCodec for ClassicPolyline {
    fn encode(&self, coordinates: &[Coordinate]) -> String {
        let mut encoded = String::with_capacity(coordinates.len() * 8);
        let (mut prev_lat, mut prev_lon) = (0i64, 0i64);
        for c in coordinates {
            let lat = scale(c.latitude);
            let lon = scale(c.longitude);
            write_signed(lat.wrapping_sub(prev_lat), &mut encoded, symbol);
            write_signed(lon.wrapping_sub(prev_lon), &mut encoded, symbol);
            prev_lat = lat;
            prev_lon = lon;
        }
        encoded
    }

    fn decode(&self, encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
        let mut reader = ValueReader::new(encoded, lookup);
        let mut points = Vec::with_capacity(encoded.len() / 8);
        let (mut lat, mut lon) = (0i64, 0i64);
        loop {
            let start = reader.position();
            let dlat = match reader.read_signed() {
                Some(dlat) => dlat?,
                None => break,
            };
            accumulate(&mut lat, dlat, start)?;
            accumulate(&mut lon, reader.read_component(start)?, start)?;
            points.push(Coordinate::new(lat as f64 / SCALE, lon as f64 / SCALE));
        }
        debug!(points = points.len(), "decoded classic polyline");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<Coordinate> {
        vec![Coordinate::new(38.5, -120.2),
             Coordinate::new(40.7, -120.95),
             Coordinate::new(43.252, -126.453)]
    }

    #[test]
    fn encodes_reference_path() {
        assert_eq!(ClassicPolyline.encode(&reference()), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn decodes_reference_path() {
        let decoded = ClassicPolyline.decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(decoded.len(), 3);
        for (d, r) in decoded.iter().zip(reference()) {
            assert_abs_diff_eq!(d.latitude, r.latitude, epsilon = 1e-5);
            assert_abs_diff_eq!(d.longitude, r.longitude, epsilon = 1e-5);
        }
    }

    #[test]
    fn empty_path() {
        assert_eq!(ClassicPolyline.encode(&[]), "");
        assert_eq!(ClassicPolyline.decode("").unwrap(), vec![]);
    }

    #[test]
    fn single_point_is_absolute() {
        let p = Coordinate::new(19.4326, -99.1332);
        let encoded = ClassicPolyline.encode(&[p]);
        let mut expected = String::new();
        write_signed(1943260, &mut expected, symbol);
        write_signed(-9913320, &mut expected, symbol);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn round_trips_within_precision() {
        let path = vec![Coordinate::new(19.4326, -99.1332),
                        Coordinate::new(19.4234, -99.1685),
                        Coordinate::new(-33.86785, 151.20732),
                        Coordinate::new(0.0, 0.0),
                        Coordinate::new(89.99999, 179.99999),
                        Coordinate::new(-89.99999, -179.99999)];
        let decoded = ClassicPolyline.decode(&ClassicPolyline.encode(&path)).unwrap();
        assert_eq!(decoded.len(), path.len());
        for (d, p) in decoded.iter().zip(&path) {
            assert_abs_diff_eq!(d.latitude, p.latitude, epsilon = 1e-5);
            assert_abs_diff_eq!(d.longitude, p.longitude, epsilon = 1e-5);
        }
    }

    #[test]
    fn rejects_character_outside_alphabet() {
        assert_eq!(ClassicPolyline.decode("_p~iF ps|U"),
                   Err(DecodeError::InvalidCharacter { character: ' ', position: 5 }));
    }

    #[test]
    fn rejects_truncated_value() {
        // Drop the final group of the longitude.
        assert_eq!(ClassicPolyline.decode("_p~iF~ps|"),
                   Err(DecodeError::Truncated { position: 5 }));
    }

    #[test]
    fn rejects_latitude_without_longitude() {
        assert_eq!(ClassicPolyline.decode("_p~iF"),
                   Err(DecodeError::IncompletePoint { position: 0 }));
    }
}
