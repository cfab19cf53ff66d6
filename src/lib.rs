//! Geospatial helpers for tracking deliveries on a map: great-circle distances, display
//! formatting of distances and durations, polyline codecs for exchanging routes with mapping
//! providers, and map viewport fitting.
//!
//! Everything here is a pure function over plain values and may be called from any number of
//! threads. Coordinates are never range-checked; see [`Coordinate`].

extern crate geojson;
extern crate num;
extern crate rayon;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;
extern crate tracing;

#[cfg(test)]
#[macro_use]
extern crate approx;

mod types;
pub use crate::types::*;
mod error;
pub use crate::error::{DecodeError, Error, Result};
pub mod config;
pub mod format;
pub use crate::format::{format_distance, format_duration, Measurement};
pub mod polyline;
pub use crate::polyline::{decode_or_empty, ClassicPolyline, Codec, FlexiblePolyline,
                          PolylineCodec};
pub mod route;
pub use crate::route::{Route, RouteStep};
pub mod util;
pub use crate::util::{fit_region, fit_region_or, haversine_distance, path_length};
