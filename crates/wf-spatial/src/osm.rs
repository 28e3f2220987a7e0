//! OSM PBF extractor — enabled with the `osm` Cargo feature.
//!
//! Performs the offline cleaning the GeoJSON path assumes has already
//! happened: road-class filtering, speed-limit imputation, one-way
//! detection, and projection into the metric plane.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use wf_spatial::osm::load_segments_from_pbf;
//!
//! let segments = load_segments_from_pbf(Path::new("city.osm.pbf"))?;
//! ```
//!
//! # What is extracted
//!
//! Only drivable `highway=*` ways (see [`class_speed_kmh`]); footways,
//! buildings, POIs, and relations are ignored, as are ways tagged
//! `access=no|private`.  `maxspeed` is honored when numeric, otherwise the
//! class default applies.
//!
//! # Memory note
//!
//! All OSM node positions are buffered in a `HashMap<i64, MetricPoint>` for
//! the first pass, because ways reference nodes by integer id.  The map is
//! dropped as soon as way geometry has been resolved.

use std::collections::HashMap;
use std::path::Path;

use osmpbf::{Element, ElementReader};

use wf_core::{GeoPoint, MetricPoint};

use crate::error::SpatialError;
use crate::segment::RoadSegment;

// ── Public entry point ────────────────────────────────────────────────────────

/// Extract road segments from an OSM PBF file, projected to the metric CRS.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on parse errors, [`SpatialError::Io`] on
/// file errors, and [`SpatialError::NoUsableData`] when the extract contains
/// no drivable roads.
pub fn load_segments_from_pbf(path: &Path) -> Result<Vec<RoadSegment>, SpatialError> {
    // ── Phase 1: collect all node positions + drivable ways ───────────────
    let reader =
        ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, MetricPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()).to_metric());
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()).to_metric());
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tags
                    .iter()
                    .find(|(k, _)| *k == "highway")
                    .map(|(_, v)| *v);

                let Some(highway) = highway else { return };
                if is_restricted(&tags) {
                    return;
                }

                if let Some(class_speed) = class_speed_kmh(highway) {
                    let speed_kmh = maxspeed_kmh(&tags).unwrap_or(class_speed);
                    let oneway = is_oneway(highway, &tags);
                    let refs: Vec<i64> = w.refs().collect();
                    road_ways.push(OsmWay { refs, speed_kmh, oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: resolve way geometry ─────────────────────────────────────
    let mut segments = Vec::with_capacity(road_ways.len());

    for way in &road_ways {
        let points: Vec<MetricPoint> = way
            .refs
            .iter()
            .filter_map(|id| all_nodes.get(id).copied())
            .collect();

        if points.len() >= 2 {
            segments.push(RoadSegment {
                points,
                oneway: way.oneway,
                speed_kmh: way.speed_kmh,
            });
        }
    }

    if segments.is_empty() {
        return Err(SpatialError::NoUsableData);
    }
    Ok(segments)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs: Vec<i64>,
    speed_kmh: f64,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Imputed speed limit (km/h) for a road class, or `None` if this `highway`
/// value is not drivable by car.
fn class_speed_kmh(highway: &str) -> Option<f64> {
    match highway {
        "motorway" | "motorway_link" => Some(100.0),
        "trunk" | "trunk_link" => Some(80.0),
        "primary" | "primary_link" => Some(60.0),
        "secondary" | "secondary_link" => Some(50.0),
        "tertiary" | "tertiary_link" => Some(40.0),
        "residential" | "living_street" | "unclassified" | "service" => Some(30.0),
        // Explicitly non-car:
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track" => None,
        // Unknown road type — assign the cautious default rather than dropping.
        _ => Some(30.0),
    }
}

/// A numeric, positive `maxspeed` tag value, if present.
fn maxspeed_kmh(tags: &[(&str, &str)]) -> Option<f64> {
    tags.iter()
        .find(|(k, _)| *k == "maxspeed")
        .and_then(|(_, v)| v.trim().parse::<f64>().ok())
        .filter(|v| *v > 0.0)
}

/// Whether a way should be treated as one-way for car traffic.
///
/// Motorways and motorway links are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags
        .iter()
        .any(|(k, v)| *k == "oneway" && matches!(*v, "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}

/// `access=no|private` ways are not routable.
fn is_restricted(tags: &[(&str, &str)]) -> bool {
    tags.iter()
        .any(|(k, v)| *k == "access" && matches!(*v, "no" | "private"))
}
