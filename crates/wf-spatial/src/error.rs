//! Spatial-subsystem error type.
//!
//! "No route between two nodes" is deliberately not an error: routing
//! functions return an empty path (and an infinite cost for weighted
//! queries), and snapping against an empty graph returns `None`.  The enum
//! below covers only data-loading failures.

use thiserror::Error;

/// Errors produced by `wf-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    Geojson(String),

    /// Every feature in the input was malformed or empty.  Individual bad
    /// features are skipped; only a total absence of usable data fails.
    #[error("no usable road segments in input")]
    NoUsableData,

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
