//! Coordinate types and the geographic ↔ metric projection boundary.
//!
//! The routing engine works exclusively in **projected metric space**
//! (spherical Web Mercator, EPSG:3857): node identity, edge weights, and
//! nearest-node snapping are all Euclidean computations on metres.  Latitude
//! and longitude exist only at the request boundary, so the conversion lives
//! here and nothing inside `wf-spatial` ever sees a degree.
//!
//! Both point types use `f64`.  Mercator coordinates at mid-latitudes are on
//! the order of 1e7 m, and node interning rounds them to a 1 m grid — `f32`
//! (≈1 m resolution at that magnitude) would make the grid assignment itself
//! unstable.

use crate::error::CoreError;

/// Mean equatorial Earth radius used by spherical Web Mercator, metres.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Project to spherical Web Mercator (EPSG:3857).
    ///
    /// Valid for |lat| < 85.05° — the poles map to ±infinity.  Road data is
    /// city-scale, so the projection is applied without clamping.
    pub fn to_metric(self) -> MetricPoint {
        let x = self.lon.to_radians() * EARTH_RADIUS_M;
        let y = (std::f64::consts::FRAC_PI_4 + self.lat.to_radians() / 2.0)
            .tan()
            .ln()
            * EARTH_RADIUS_M;
        MetricPoint { x, y }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = CoreError;

    /// Parse a `"lat,lng"` pair, as received in query strings.
    ///
    /// Whitespace around either component is ignored.  Coordinates outside
    /// the WGS-84 domain are rejected.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Parse(format!("invalid coordinate format: {raw}"));

        let mut parts = raw.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::Parse(format!("coordinate out of range: {raw}")));
        }
        Ok(GeoPoint { lat, lon })
    }
}

// ── MetricPoint ───────────────────────────────────────────────────────────────

/// A position in the projected metric plane (EPSG:3857), metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricPoint {
    pub x: f64,
    pub y: f64,
}

impl MetricPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Inverse Web Mercator: recover the WGS-84 coordinate.
    pub fn to_geo(self) -> GeoPoint {
        let lon = (self.x / EARTH_RADIUS_M).to_degrees();
        let lat = (2.0 * (self.y / EARTH_RADIUS_M).exp().atan()
            - std::f64::consts::FRAC_PI_2)
            .to_degrees();
        GeoPoint { lat, lon }
    }

    /// Straight-line distance to `other` in metres.
    #[inline]
    pub fn distance(self, other: MetricPoint) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared distance — cheaper when only comparing magnitudes.
    #[inline]
    pub fn distance_sq(self, other: MetricPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// The integer grid cell this position falls into, at 1 m resolution.
    ///
    /// Positions within half a metre of each other share a cell, which is the
    /// equality relation used to deduplicate road-segment endpoints into
    /// graph nodes.
    #[inline]
    pub fn grid_key(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

impl std::fmt::Display for MetricPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
