//! GeoJSON road-segment loader.
//!
//! # Input format
//!
//! A FeatureCollection of LineString / MultiLineString features whose
//! coordinates are **already in the graph's metric CRS** (the output of the
//! offline cleaning pipeline).  Recognized properties:
//!
//! | Property    | Type        | Meaning                                   |
//! |-------------|-------------|-------------------------------------------|
//! | `is_oneway` | bool or 0/1 | Single directed edge per vertex pair      |
//! | `speed_kmh` | number      | Speed limit; missing → 30 km/h            |
//!
//! MultiLineString features decompose into one independent segment per part.
//! Features with other geometry types, missing geometry, or degenerate
//! coordinate lists are skipped — only a total absence of usable segments is
//! an error.

use std::path::Path;

use geojson::{Feature, GeoJson, Geometry, JsonValue, Value};
use tracing::info;

use wf_core::MetricPoint;

use crate::error::SpatialError;
use crate::network::DEFAULT_SPEED_KMH;
use crate::segment::RoadSegment;

/// Load road segments from a GeoJSON file.
pub fn load_segments(path: &Path) -> Result<Vec<RoadSegment>, SpatialError> {
    let text = std::fs::read_to_string(path)?;
    parse_segments(&text)
}

/// Like [`load_segments`] but parses an in-memory GeoJSON document.
///
/// Useful for testing and for sources that are not files.
pub fn parse_segments(text: &str) -> Result<Vec<RoadSegment>, SpatialError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| SpatialError::Geojson(e.to_string()))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(SpatialError::Geojson("expected a FeatureCollection".into()));
    };

    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for feature in collection.features {
        let oneway = prop_bool(&feature, "is_oneway");
        let speed_kmh = prop_f64(&feature, "speed_kmh").unwrap_or(DEFAULT_SPEED_KMH);

        match feature.geometry {
            Some(Geometry { value: Value::LineString(line), .. }) => {
                push_line(&mut segments, &mut skipped, &line, oneway, speed_kmh);
            }
            Some(Geometry { value: Value::MultiLineString(lines), .. }) => {
                for line in &lines {
                    push_line(&mut segments, &mut skipped, line, oneway, speed_kmh);
                }
            }
            _ => skipped += 1,
        }
    }

    if segments.is_empty() {
        return Err(SpatialError::NoUsableData);
    }

    info!(segments = segments.len(), skipped, "loaded road segments");
    Ok(segments)
}

/// Append one polyline as a segment, or count it as skipped if degenerate.
fn push_line(
    segments: &mut Vec<RoadSegment>,
    skipped: &mut usize,
    line: &[Vec<f64>],
    oneway: bool,
    speed_kmh: f64,
) {
    if line.len() < 2 || line.iter().any(|c| c.len() < 2) {
        *skipped += 1;
        return;
    }

    let points = line.iter().map(|c| MetricPoint::new(c[0], c[1])).collect();
    segments.push(RoadSegment { points, oneway, speed_kmh });
}

fn prop_bool(feature: &Feature, name: &str) -> bool {
    match feature.property(name) {
        Some(JsonValue::Bool(b)) => *b,
        // Shapefile-derived data often encodes flags as 0/1.
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

fn prop_f64(feature: &Feature, name: &str) -> Option<f64> {
    feature.property(name).and_then(JsonValue::as_f64)
}
