/// A map coordinate in decimal degrees (WGS84).
///
/// Values are not validated: latitude is expected in `[-90, 90]` and longitude in `[-180, 180]`,
/// and supplying anything else is the caller's responsibility. Functions in this crate give
/// unspecified (but non-panicking) results for out-of-range input.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate { latitude, longitude }
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Build from a `(latitude, longitude)` pair.
    fn from(pair: (f64, f64)) -> Coordinate {
        Coordinate::new(pair.0, pair.1)
    }
}

/// Represent some map bounds, in degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn range_lat(&self) -> f64 {
        self.north - self.south
    }
    pub fn range_lon(&self) -> f64 {
        self.east - self.west
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.north + self.south) / 2.0, (self.east + self.west) / 2.0)
    }
}

/// Visible map viewport: a center plus the full latitude and longitude span of the box.
/// A zero span is legal and represents a single point.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// Mexico City, used when there is nothing to fit.
pub const DEFAULT_REGION: Region = Region {
    center: Coordinate::new(19.4326, -99.1332),
    latitude_delta: 0.0922,
    longitude_delta: 0.0421,
};

impl Default for Region {
    fn default() -> Region {
        DEFAULT_REGION
    }
}

impl Region {
    /// True iff the coordinate lies inside the closed box `center ± delta / 2` on both axes.
    pub fn contains(&self, c: Coordinate) -> bool {
        let b = self.bounds();
        c.latitude >= b.south && c.latitude <= b.north && c.longitude >= b.west &&
        c.longitude <= b.east
    }

    /// The region's extents as bounds.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            north: self.center.latitude + self.latitude_delta / 2.0,
            south: self.center.latitude - self.latitude_delta / 2.0,
            east: self.center.longitude + self.longitude_delta / 2.0,
            west: self.center.longitude - self.longitude_delta / 2.0,
        }
    }
}
