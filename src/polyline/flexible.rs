use tracing::debug;

use super::{accumulate, write_signed, write_unsigned, PolylineCodec, ValueReader};
use crate::error::{DecodeError, Error};
use crate::types::Coordinate;

const FORMAT_VERSION: u64 = 1;
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

pub const DEFAULT_PRECISION: u8 = 5;
pub const MAX_PRECISION: u8 = 15;

/// Kind of the optional third value stored with each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThirdDimension {
    Absent,
    Level,
    Altitude,
    Elevation,
    Custom1,
    Custom2,
}

impl ThirdDimension {
    fn code(self) -> u64 {
        match self {
            ThirdDimension::Absent => 0,
            ThirdDimension::Level => 1,
            ThirdDimension::Altitude => 2,
            ThirdDimension::Elevation => 3,
            // 4 and 5 are reserved
            ThirdDimension::Custom1 => 6,
            ThirdDimension::Custom2 => 7,
        }
    }

    fn from_code(code: u64) -> Option<ThirdDimension> {
        match code {
            0 => Some(ThirdDimension::Absent),
            1 => Some(ThirdDimension::Level),
            2 => Some(ThirdDimension::Altitude),
            3 => Some(ThirdDimension::Elevation),
            6 => Some(ThirdDimension::Custom1),
            7 => Some(ThirdDimension::Custom2),
            _ => None,
        }
    }
}

/// Decoding parameters carried at the start of every flexible polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexibleHeader {
    pub precision: u8,
    pub third_dimension: ThirdDimension,
    pub third_dimension_precision: u8,
}

impl FlexibleHeader {
    /// Parse only the header of an encoded string.
    pub fn read(encoded: &str) -> Result<FlexibleHeader, DecodeError> {
        let mut reader = ValueReader::new(encoded, lookup);
        FlexibleHeader::read_from(&mut reader)
    }

    fn read_from<F: Fn(u8) -> Option<u8>>(reader: &mut ValueReader<F>)
                                          -> Result<FlexibleHeader, DecodeError> {
        let version = reader.read_unsigned().ok_or(DecodeError::MissingHeader)??;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let bits = reader.read_unsigned().ok_or(DecodeError::MissingHeader)??;
        if bits >> 11 != 0 {
            return Err(DecodeError::InvalidHeader(bits));
        }
        let third_dimension = ThirdDimension::from_code((bits >> 4) & 0x7)
            .ok_or(DecodeError::InvalidHeader(bits))?;
        Ok(FlexibleHeader {
            precision: (bits & 0xf) as u8,
            third_dimension: third_dimension,
            third_dimension_precision: ((bits >> 7) & 0xf) as u8,
        })
    }

    fn write(&self, out: &mut String) {
        write_unsigned(FORMAT_VERSION, out, symbol);
        let bits = u64::from(self.precision) | self.third_dimension.code() << 4 |
                   u64::from(self.third_dimension_precision) << 7;
        write_unsigned(bits, out, symbol);
    }
}

/// A decoded point together with its third value. `third` is 0 when the header says the third
/// dimension is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: Coordinate,
    pub third: f64,
}

/// HERE flexible polyline format (version 1).
///
/// Groups map onto the URL-safe base64 alphabet and the string starts with a header holding the
/// precision, so a decoder never needs to be told how the path was encoded: `decode` honours
/// whatever precision the header names, not the one this codec encodes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexiblePolyline {
    precision: u8,
}

impl Default for FlexiblePolyline {
    fn default() -> FlexiblePolyline {
        FlexiblePolyline { precision: DEFAULT_PRECISION }
    }
}

#[inline]
fn symbol(group: u8) -> char {
    ALPHABET[group as usize] as char
}

#[inline]
fn lookup(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'-' => Some(62),
        b'_' => Some(63),
        _ => None,
    }
}

fn check_precision(precision: u8) -> Result<u8, Error> {
    if precision > MAX_PRECISION {
        Err(Error::InvalidPrecision(precision))
    } else {
        Ok(precision)
    }
}

/// Round half away from zero.
#[inline]
fn scale(value: f64, factor: f64) -> i64 {
    (value * factor).round() as i64
}

impl FlexiblePolyline {
    /// Codec writing `precision` decimal digits, at most 15.
    pub fn new(precision: u8) -> Result<FlexiblePolyline, Error> {
        Ok(FlexiblePolyline { precision: check_precision(precision)? })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Encode points with a third value of the given kind. With `ThirdDimension::Absent` the
    /// third values are dropped and, for a non-empty path, the output equals `encode` of the
    /// coordinates. The header is always written.
    pub fn encode_3d(&self,
                     positions: &[Position],
                     third_dimension: ThirdDimension,
                     third_dimension_precision: u8)
                     -> Result<String, Error> {
        let header = FlexibleHeader {
            precision: self.precision,
            third_dimension: third_dimension,
            third_dimension_precision: match third_dimension {
                ThirdDimension::Absent => 0,
                _ => check_precision(third_dimension_precision)?,
            },
        };
        Ok(encode_body(&header, positions.iter().map(|p| (p.coordinate, p.third))))
    }

    /// Decode the header and every point including its third value.
    pub fn decode_3d(&self, encoded: &str) -> Result<(FlexibleHeader, Vec<Position>), DecodeError> {
        let mut reader = ValueReader::new(encoded, lookup);
        let header = FlexibleHeader::read_from(&mut reader)?;
        let factor = 10f64.powi(i32::from(header.precision));
        let third_factor = 10f64.powi(i32::from(header.third_dimension_precision));
        let has_third = header.third_dimension != ThirdDimension::Absent;

        let mut positions = Vec::with_capacity(encoded.len() / 8);
        let (mut lat, mut lon, mut third) = (0i64, 0i64, 0i64);
        loop {
            let start = reader.position();
            let dlat = match reader.read_signed() {
                Some(dlat) => dlat?,
                None => break,
            };
            accumulate(&mut lat, dlat, start)?;
            accumulate(&mut lon, reader.read_component(start)?, start)?;
            if has_third {
                accumulate(&mut third, reader.read_component(start)?, start)?;
            }
            positions.push(Position {
                coordinate: Coordinate::new(lat as f64 / factor, lon as f64 / factor),
                third: third as f64 / third_factor,
            });
        }
        debug!(points = positions.len(),
               precision = header.precision,
               third_dimension = ?header.third_dimension,
               "decoded flexible polyline");
        Ok((header, positions))
    }
}

fn encode_body<I: Iterator<Item = (Coordinate, f64)>>(header: &FlexibleHeader, points: I) -> String {
    let factor = 10f64.powi(i32::from(header.precision));
    let third_factor = 10f64.powi(i32::from(header.third_dimension_precision));
    let has_third = header.third_dimension != ThirdDimension::Absent;

    let mut encoded = String::new();
    header.write(&mut encoded);
    let (mut prev_lat, mut prev_lon, mut prev_third) = (0i64, 0i64, 0i64);
    for (c, z) in points {
        let lat = scale(c.latitude, factor);
        let lon = scale(c.longitude, factor);
        write_signed(lat.wrapping_sub(prev_lat), &mut encoded, symbol);
        write_signed(lon.wrapping_sub(prev_lon), &mut encoded, symbol);
        prev_lat = lat;
        prev_lon = lon;
        if has_third {
            let third = scale(z, third_factor);
            write_signed(third.wrapping_sub(prev_third), &mut encoded, symbol);
            prev_third = third;
        }
    }
    encoded
}

impl PolylineCodec for FlexiblePolyline {
    /// Encode with this codec's precision and no third dimension. An empty path encodes to an
    /// empty string, without a header.
    fn encode(&self, coordinates: &[Coordinate]) -> String {
        if coordinates.is_empty() {
            return String::new();
        }
        let header = FlexibleHeader {
            precision: self.precision,
            third_dimension: ThirdDimension::Absent,
            third_dimension_precision: 0,
        };
        encode_body(&header, coordinates.iter().map(|&c| (c, 0.0)))
    }

    /// Decode any flexible polyline, dropping third values. An empty string is an empty path.
    fn decode(&self, encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }
        let (_, positions) = self.decode_3d(encoded)?;
        Ok(positions.into_iter().map(|p| p.coordinate).collect())
    }
}
