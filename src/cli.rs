use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use routeline::config::{CodecKind, Config};
use routeline::util::{path_from_geojson, path_to_geojson};
use routeline::{fit_region_or, haversine_distance, Coordinate, Measurement, PolylineCodec, Route};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "routeline", version, about = "Encode, decode and measure map routes")]
pub struct Args {
    /// JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Polyline format, overriding the config.
    #[arg(long, global = true)]
    pub codec: Option<CodecKind>,
    /// Flexible polyline precision, overriding the config.
    #[arg(long, global = true)]
    pub precision: Option<u8>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a JSON list of coordinates or a GeoJSON LineString read from a file or stdin.
    Encode {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Decode a polyline to JSON coordinates.
    Decode {
        polyline: String,
        /// Print a GeoJSON LineString instead.
        #[arg(long)]
        geojson: bool,
    },
    /// Great-circle distance between two `LAT,LNG` points.
    Distance {
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
    },
    /// Map region showing a polyline.
    Fit {
        polyline: String,
        #[arg(long)]
        padding: Option<f64>,
    },
    /// Straight-line route estimate between two `LAT,LNG` points.
    Route {
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
    },
}

/// Parse `LAT,LNG` in decimal degrees.
pub fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let mut parts = s.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => {
            let lat = lat.trim().parse::<f64>().map_err(|e| format!("latitude: {}", e))?;
            let lng = lng.trim().parse::<f64>().map_err(|e| format!("longitude: {}", e))?;
            Ok(Coordinate::new(lat, lng))
        }
        _ => Err(format!("expected LAT,LNG, got {:?}", s)),
    }
}

impl Args {
    /// Defaults, then the config file, then the environment, then command-line flags.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => {
                Config::from_path(path)
                    .with_context(|| format!("reading config {}", path.display()))?
            }
            None => Config::default(),
        };
        config.apply_env().context("applying environment overrides")?;
        if let Some(codec) = self.codec {
            config.codec = codec;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Read coordinates as a JSON list of `{latitude, longitude}` objects, a JSON list of
/// `[lat, lng]` pairs, or a GeoJSON LineString.
fn read_path<R: Read>(mut reader: R) -> anyhow::Result<Vec<Coordinate>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if let Ok(path) = ::serde_json::from_str::<Vec<Coordinate>>(&text) {
        return Ok(path);
    }
    if let Ok(pairs) = ::serde_json::from_str::<Vec<(f64, f64)>>(&text) {
        return Ok(pairs.into_iter().map(Coordinate::from).collect());
    }
    match path_from_geojson(text.as_bytes()) {
        Ok(path) => Ok(path),
        Err(e) => bail!("input is neither a coordinate list nor GeoJSON: {}", e),
    }
}

/// Run one command and return what should be printed.
pub fn run(command: Command, config: &Config) -> anyhow::Result<String> {
    let codec = config.codec()?;
    let output = match command {
        Command::Encode { input } => {
            let path = match input {
                Some(p) => {
                    let file = File::open(&p).with_context(|| format!("opening {}", p.display()))?;
                    read_path(file)?
                }
                None => read_path(io::stdin())?,
            };
            info!(points = path.len(), codec = codec.name(), "encoding path");
            codec.encode(&path)
        }
        Command::Decode { polyline, geojson } => {
            let path = codec.decode(&polyline).context("decoding polyline")?;
            if geojson {
                ::serde_json::to_string_pretty(&path_to_geojson(&path))?
            } else {
                ::serde_json::to_string_pretty(&path)?
            }
        }
        Command::Distance { from, to } => {
            ::serde_json::to_string_pretty(&Measurement::distance(haversine_distance(from, to)))?
        }
        Command::Fit { polyline, padding } => {
            let path = codec.decode(&polyline).context("decoding polyline")?;
            let region = fit_region_or(&path,
                                       padding.unwrap_or(config.padding),
                                       config.default_region);
            ::serde_json::to_string_pretty(&region)?
        }
        Command::Route { from, to } => {
            let route = Route::straight_line(from, to, config.average_speed, &codec);
            ::serde_json::to_string_pretty(&route)?
        }
    };
    Ok(output)
}
