//! Runtime settings: which polyline format to speak and the map defaults.
//!
//! Settings come from a JSON file, every field optional:
//!
//! ```json
//! {
//!     "codec": "flexible",
//!     "precision": 6,
//!     "padding": 1.2,
//!     "defaultRegion": {
//!         "center": { "latitude": 19.4326, "longitude": -99.1332 },
//!         "latitudeDelta": 0.0922,
//!         "longitudeDelta": 0.0421
//!     },
//!     "averageSpeed": 8.3
//! }
//! ```
//!
//! and can then be overridden by `ROUTELINE_CODEC`, `ROUTELINE_PRECISION` and
//! `ROUTELINE_PADDING`.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::polyline::{ClassicPolyline, Codec, FlexiblePolyline, DEFAULT_PRECISION, MAX_PRECISION};
use crate::route::DEFAULT_SPEED;
use crate::types::{Region, DEFAULT_REGION};
use crate::util::DEFAULT_PADDING;

pub const CODEC_VAR: &str = "ROUTELINE_CODEC";
pub const PRECISION_VAR: &str = "ROUTELINE_PRECISION";
pub const PADDING_VAR: &str = "ROUTELINE_PADDING";

/// Polyline wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Google encoded polyline, fixed 1e-5 scale.
    Classic,
    /// HERE flexible polyline.
    Flexible,
}

impl FromStr for CodecKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<CodecKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "google" => Ok(CodecKind::Classic),
            "flexible" | "here" => Ok(CodecKind::Flexible),
            other => Err(Error::InvalidConfig(format!("unknown codec {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub codec: CodecKind,
    /// Decimal digits written by the flexible codec. The classic codec always uses 5.
    pub precision: u8,
    pub padding: f64,
    pub default_region: Region,
    /// Meters per second used for straight-line route estimates.
    pub average_speed: f64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            codec: CodecKind::Classic,
            precision: DEFAULT_PRECISION,
            padding: DEFAULT_PADDING,
            default_region: DEFAULT_REGION,
            average_speed: DEFAULT_SPEED,
        }
    }
}

impl Config {
    /// Load and validate a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let file = File::open(path.as_ref())?;
        let config: Config = ::serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup, then validate.
    pub fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) -> Result<()> {
        if let Some(codec) = lookup(CODEC_VAR) {
            self.codec = codec.parse()?;
        }
        if let Some(precision) = lookup(PRECISION_VAR) {
            self.precision = precision.trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{} is not a precision", precision)))?;
        }
        if let Some(padding) = lookup(PADDING_VAR) {
            self.padding = padding.trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{} is not a padding", padding)))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::InvalidPrecision(self.precision));
        }
        if !(self.padding.is_finite() && self.padding > 0.0) {
            return Err(Error::InvalidConfig(format!("padding must be positive, got {}",
                                                    self.padding)));
        }
        if !(self.average_speed.is_finite() && self.average_speed > 0.0) {
            return Err(Error::InvalidConfig(format!("average speed must be positive, got {}",
                                                    self.average_speed)));
        }
        let r = &self.default_region;
        if !(r.latitude_delta >= 0.0 && r.longitude_delta >= 0.0) {
            return Err(Error::InvalidConfig("default region deltas must be non-negative"
                .to_string()));
        }
        Ok(())
    }

    /// The codec this configuration selects.
    pub fn codec(&self) -> Result<Codec> {
        let codec = match self.codec {
            CodecKind::Classic => Codec::Classic(ClassicPolyline),
            CodecKind::Flexible => Codec::Flexible(FlexiblePolyline::new(self.precision)?),
        };
        debug!(codec = codec.name(), precision = self.precision, "selected polyline codec");
        Ok(codec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.codec, CodecKind::Classic);
        assert_eq!(config.precision, 5);
        assert_eq!(config.padding, 1.2);
        assert_eq!(config.default_region, DEFAULT_REGION);
        assert!(config.validate().is_ok());
        assert_eq!(config.codec().unwrap(), Codec::Classic(ClassicPolyline));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config = ::serde_json::from_str(r#"{"codec": "flexible", "precision": 7}"#)
            .unwrap();
        assert_eq!(config.codec, CodecKind::Flexible);
        assert_eq!(config.padding, DEFAULT_PADDING);
        match config.codec().unwrap() {
            Codec::Flexible(f) => assert_eq!(f.precision(), 7),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(::serde_json::from_str::<Config>(r#"{"codecs": "flexible"}"#).is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = Config::default();
        let vars = overrides(&[(CODEC_VAR, "HERE"), (PRECISION_VAR, " 6 "), (PADDING_VAR, "1.5")]);
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.codec, CodecKind::Flexible);
        assert_eq!(config.precision, 6);
        assert_eq!(config.padding, 1.5);
    }

    #[test]
    fn bad_overrides_are_errors() {
        let mut config = Config::default();
        let vars = overrides(&[(CODEC_VAR, "mapbox")]);
        assert!(config.apply_overrides(|k| vars.get(k).cloned()).is_err());

        let vars = overrides(&[(PRECISION_VAR, "16")]);
        match Config::default().apply_overrides(|k| vars.get(k).cloned()) {
            Err(Error::InvalidPrecision(16)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let vars = overrides(&[(PADDING_VAR, "-1")]);
        assert!(Config::default().apply_overrides(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn loads_from_file() {
        let path = env::temp_dir().join(format!("routeline-config-{}.json", std::process::id()));
        {
            let mut f = File::create(&path).unwrap();
            write!(f,
                   r#"{{"codec": "flexible", "defaultRegion": {{
                       "center": {{"latitude": 40.4168, "longitude": -3.7038}},
                       "latitudeDelta": 0.2, "longitudeDelta": 0.2}}}}"#)
                .unwrap();
        }
        let config = Config::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.codec, CodecKind::Flexible);
        assert_eq!(config.default_region.center.latitude, 40.4168);

        match Config::from_path(&path) {
            Err(Error::Io(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
