use std::io;

use thiserror::Error;

/// Why an encoded path could not be decoded. `position` is a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("input ends inside a value starting at position {position}")]
    Truncated { position: usize },

    #[error("value starting at position {position} does not fit in 64 bits")]
    Overflow { position: usize },

    #[error("incomplete point at position {position}")]
    IncompletePoint { position: usize },

    #[error("flexible polyline header is missing")]
    MissingHeader,

    #[error("unsupported flexible polyline version {0}")]
    UnsupportedVersion(u64),

    #[error("invalid flexible polyline header {0:#x}")]
    InvalidHeader(u64),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed polyline: {0}")]
    Decode(#[from] DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no LineString geometry found")]
    NoLineString,

    #[error("position {index} of the LineString has fewer than two values")]
    InvalidPosition { index: usize },

    #[error("precision {0} is out of range (0..=15)")]
    InvalidPrecision(u8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
