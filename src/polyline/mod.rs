//! Polyline codecs: compact string encodings of an ordered list of coordinates.
//!
//! Two wire formats are supported, each as its own named codec:
//!
//! * [`ClassicPolyline`], the Google encoded polyline format at a fixed 1e-5 degree scale.
//! * [`FlexiblePolyline`], the HERE flexible polyline format, which carries its precision (and an
//!   optional third dimension) in a header.
//!
//! Both share the same core: values are scaled to integers, delta coded against the previous
//! point, zigzag mapped to unsigned and written as little-endian 5-bit groups with a `0x20`
//! continuation bit. They differ in the character mapping of each group and in the header.
//! [`Codec`] selects one of them at runtime.

use tracing::warn;

use crate::error::DecodeError;
use crate::types::Coordinate;

mod classic;
mod flexible;

pub use self::classic::ClassicPolyline;
pub use self::flexible::{FlexibleHeader, FlexiblePolyline, Position, ThirdDimension,
                         DEFAULT_PRECISION, MAX_PRECISION};

/// Encode and decode paths to and from one polyline wire format.
pub trait PolylineCodec: Send + Sync {
    /// Encode coordinates in order, latitude before longitude for each point.
    fn encode(&self, coordinates: &[Coordinate]) -> String;

    /// Decode a string produced by this format's encoder.
    fn decode(&self, encoded: &str) -> Result<Vec<Coordinate>, DecodeError>;
}

/// Decode at a boundary that cannot handle errors: a malformed path is logged and treated as
/// empty, so nothing gets drawn.
pub fn decode_or_empty<C: PolylineCodec + ?Sized>(codec: &C, encoded: &str) -> Vec<Coordinate> {
    match codec.decode(encoded) {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, len = encoded.len(), "dropping malformed polyline");
            Vec::new()
        }
    }
}

/// Wire format selection, typically made from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Codec {
    Classic(ClassicPolyline),
    Flexible(FlexiblePolyline),
}

impl Codec {
    pub fn name(&self) -> &'static str {
        match *self {
            Codec::Classic(_) => "classic",
            Codec::Flexible(_) => "flexible",
        }
    }
}

impl PolylineCodec for Codec {
    fn encode(&self, coordinates: &[Coordinate]) -> String {
        match *self {
            Codec::Classic(ref c) => c.encode(coordinates),
            Codec::Flexible(ref c) => c.encode(coordinates),
        }
    }

    fn decode(&self, encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
        match *self {
            Codec::Classic(ref c) => c.decode(encoded),
            Codec::Flexible(ref c) => c.decode(encoded),
        }
    }
}

impl From<ClassicPolyline> for Codec {
    fn from(c: ClassicPolyline) -> Codec {
        Codec::Classic(c)
    }
}

impl From<FlexiblePolyline> for Codec {
    fn from(c: FlexiblePolyline) -> Codec {
        Codec::Flexible(c)
    }
}

/// Map a signed value to unsigned so that small magnitudes of either sign stay small.
#[inline]
fn zigzag(value: i64) -> u64 {
    if value < 0 {
        !(value << 1) as u64
    } else {
        (value << 1) as u64
    }
}

#[inline]
fn unzigzag(value: u64) -> i64 {
    if value & 1 == 1 {
        !((value >> 1) as i64)
    } else {
        (value >> 1) as i64
    }
}

/// Append `value` as 5-bit groups, least significant first, each mapped to a character by
/// `symbol`. Every group but the last carries the 0x20 continuation bit.
fn write_unsigned<F: Fn(u8) -> char>(mut value: u64, out: &mut String, symbol: F) {
    while value >= 0x20 {
        out.push(symbol(((value & 0x1f) | 0x20) as u8));
        value >>= 5;
    }
    out.push(symbol(value as u8));
}

/// Add a decoded delta to a running total, reporting overflow against the value at `position`.
#[inline]
fn accumulate(total: &mut i64, delta: i64, position: usize) -> Result<(), DecodeError> {
    *total = total.checked_add(delta).ok_or(DecodeError::Overflow { position: position })?;
    Ok(())
}

#[inline]
fn write_signed<F: Fn(u8) -> char>(value: i64, out: &mut String, symbol: F) {
    write_unsigned(zigzag(value), out, symbol)
}

/// Reads variable length values from an encoded string. `lookup` maps a byte back to its 6-bit
/// group, or `None` when the byte is outside the format's alphabet.
struct ValueReader<'a, F> {
    bytes: &'a [u8],
    pos: usize,
    lookup: F,
}

impl<'a, F: Fn(u8) -> Option<u8>> ValueReader<'a, F> {
    fn new(encoded: &'a str, lookup: F) -> ValueReader<'a, F> {
        ValueReader {
            bytes: encoded.as_bytes(),
            pos: 0,
            lookup: lookup,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// Read one unsigned value. Returns `None` at the end of input.
    fn read_unsigned(&mut self) -> Option<Result<u64, DecodeError>> {
        if self.is_empty() {
            return None;
        }
        let start = self.pos;
        let mut result = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = match self.bytes.get(self.pos) {
                Some(&b) => b,
                None => return Some(Err(DecodeError::Truncated { position: start })),
            };
            let group = match (self.lookup)(byte) {
                Some(g) => g,
                None => {
                    return Some(Err(DecodeError::InvalidCharacter {
                        character: invalid_char(self.bytes, self.pos),
                        position: self.pos,
                    }))
                }
            };
            self.pos += 1;
            let chunk = u64::from(group & 0x1f);
            if shift >= 64 || (chunk << shift) >> shift != chunk {
                return Some(Err(DecodeError::Overflow { position: start }));
            }
            result |= chunk << shift;
            if group & 0x20 == 0 {
                return Some(Ok(result));
            }
            shift += 5;
        }
    }

    fn read_signed(&mut self) -> Option<Result<i64, DecodeError>> {
        self.read_unsigned().map(|r| r.map(unzigzag))
    }

    /// Read a value that must be present because a point has been started at `point_start`.
    fn read_component(&mut self, point_start: usize) -> Result<i64, DecodeError> {
        match self.read_signed() {
            Some(r) => r,
            None => Err(DecodeError::IncompletePoint { position: point_start }),
        }
    }
}

/// Recover the full character at a byte offset for error reporting; multi-byte UTF-8 input is
/// never part of either alphabet.
fn invalid_char(bytes: &[u8], pos: usize) -> char {
    let tail = &bytes[pos..];
    let end = tail.len().min(4);
    (1..=end)
        .filter_map(|n| std::str::from_utf8(&tail[..n]).ok())
        .filter_map(|s| s.chars().next())
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
