//! Road-segment geometry and per-segment attributes.

use wf_core::MetricPoint;

use crate::network::DEFAULT_SPEED_KMH;

/// One polyline of road geometry in the projected metric plane, plus the
/// attributes that determine edge direction and travel-time weight.
///
/// Multi-part source geometries (e.g. GeoJSON MultiLineString) are decomposed
/// into one `RoadSegment` per part before they reach the graph builder.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    /// Ordered vertex positions.  Fewer than 2 points makes the segment
    /// unusable; the builder skips it.
    pub points: Vec<MetricPoint>,
    /// One-way segments contribute a single directed edge per vertex pair
    /// instead of a reciprocal pair.
    pub oneway: bool,
    /// Signed speed limit in km/h.  Non-positive values fall back to
    /// [`DEFAULT_SPEED_KMH`] during time weighting.
    pub speed_kmh: f64,
}

impl RoadSegment {
    /// A bidirectional segment at the default speed.
    pub fn new(points: Vec<MetricPoint>) -> Self {
        Self { points, oneway: false, speed_kmh: DEFAULT_SPEED_KMH }
    }

    pub fn oneway(mut self, oneway: bool) -> Self {
        self.oneway = oneway;
        self
    }

    pub fn speed_kmh(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }
}
